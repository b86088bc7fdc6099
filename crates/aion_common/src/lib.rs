//! Shared foundational types for the Aion simulation-model generator.
//!
//! Every name that flows from the HDL front end through the lowering pass is
//! an interned [`Ident`]; the [`Interner`] owns the backing strings.

#![warn(missing_docs)]

pub mod ident;

pub use ident::{Ident, Interner};
