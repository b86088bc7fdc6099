//! Error types for simulation-model lowering.
//!
//! Every failure aborts the module being lowered. Output already written to
//! the sink for that module is not consistent and must be discarded.

use std::fmt;

/// The taxonomy tag of a [`LowerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An AST shape the lowering pass has no rule for.
    StructuralViolation,
    /// A recognized construct that is intentionally not implemented.
    UnsupportedConstruct,
    /// An artifact an upstream pass should have supplied is missing.
    CoordinationGap,
    /// The output sink refused a write.
    Output,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::StructuralViolation => write!(f, "structural violation"),
            ErrorKind::UnsupportedConstruct => write!(f, "unsupported construct"),
            ErrorKind::CoordinationGap => write!(f, "coordination gap"),
            ErrorKind::Output => write!(f, "output error"),
        }
    }
}

/// Errors that abort the lowering of a module.
#[derive(Debug, thiserror::Error)]
pub enum LowerError {
    /// The AST contains a shape this pass does not recognize.
    #[error("module `{module}`: structural violation in {object}: {detail}")]
    StructuralViolation {
        /// The module being lowered.
        module: String,
        /// The offending object (declaration, process, instance).
        object: String,
        /// What was wrong.
        detail: String,
    },

    /// A recognized construct that this pass does not implement.
    #[error("module `{module}`: {detail} in {object}")]
    UnsupportedConstruct {
        /// The module being lowered.
        module: String,
        /// The offending object.
        object: String,
        /// The construct, e.g. "unsupported enum value".
        detail: String,
    },

    /// An upstream collaborator did not supply something this pass needs.
    #[error("module `{module}`: {detail} for {object}")]
    CoordinationGap {
        /// The module being lowered.
        module: String,
        /// The object missing its artifact.
        object: String,
        /// What is missing, e.g. "missing output-set".
        detail: String,
    },

    /// Writing to the output sink failed.
    #[error("failed to write simulation model: {0}")]
    Output(#[from] fmt::Error),
}

impl LowerError {
    /// Returns the taxonomy tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LowerError::StructuralViolation { .. } => ErrorKind::StructuralViolation,
            LowerError::UnsupportedConstruct { .. } => ErrorKind::UnsupportedConstruct,
            LowerError::CoordinationGap { .. } => ErrorKind::CoordinationGap,
            LowerError::Output(_) => ErrorKind::Output,
        }
    }

    /// Returns the name of the module whose lowering failed, if known.
    pub fn module(&self) -> Option<&str> {
        match self {
            LowerError::StructuralViolation { module, .. }
            | LowerError::UnsupportedConstruct { module, .. }
            | LowerError::CoordinationGap { module, .. } => Some(module),
            LowerError::Output(_) => None,
        }
    }
}
