//! Indentation-aware line writer over any [`fmt::Write`] sink.

use std::fmt::{self, Write};

const INDENT: &str = "    ";

/// Appends source lines to a sink, tracking the current indentation level.
///
/// The writer only ever appends; it never reads back what it wrote.
pub struct CodeWriter<W: Write> {
    out: W,
    level: usize,
}

impl<W: Write> CodeWriter<W> {
    /// Wraps a sink at indentation level zero.
    pub fn new(out: W) -> Self {
        Self { out, level: 0 }
    }

    /// Writes one line at the current indentation. Empty text yields an
    /// empty line without trailing whitespace.
    pub fn line(&mut self, text: impl AsRef<str>) -> fmt::Result {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.out.write_str(INDENT)?;
            }
            self.out.write_str(text)?;
        }
        self.out.write_char('\n')
    }

    /// Writes an empty line.
    pub fn blank(&mut self) -> fmt::Result {
        self.out.write_char('\n')
    }

    /// Writes a line and indents everything after it.
    pub fn open(&mut self, text: impl AsRef<str>) -> fmt::Result {
        self.line(text)?;
        self.level += 1;
        Ok(())
    }

    /// Dedents, then writes a line.
    pub fn close(&mut self, text: impl AsRef<str>) -> fmt::Result {
        self.level = self.level.saturating_sub(1);
        self.line(text)
    }

    /// Writes a line one level out, then stays at the current level.
    /// Used for `} else {`.
    pub fn reopen(&mut self, text: impl AsRef<str>) -> fmt::Result {
        self.close(text)?;
        self.level += 1;
        Ok(())
    }

    /// Writes `doc` line by line behind `marker` (`///` or `//`).
    pub fn doc(&mut self, marker: &str, doc: Option<&str>) -> fmt::Result {
        let Some(doc) = doc else {
            return Ok(());
        };
        for text in doc.lines() {
            let text = text.trim_end();
            if text.is_empty() {
                self.line(marker)?;
            } else {
                self.line(format!("{marker} {text}"))?;
            }
        }
        Ok(())
    }

    /// Returns the current indentation level.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Consumes the writer and returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}
