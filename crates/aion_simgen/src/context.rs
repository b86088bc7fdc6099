//! Per-module lowering context shared by every lowerer.

use aion_common::{Ident, Interner};

use crate::error::LowerError;
use crate::scope::escape_ident;

/// Where a lowered expression is going to be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place {
    /// Inside the generated constructor, where declarations are locals.
    Constructor,
    /// Inside a process method, where declarations are fields of `self`.
    Process,
    /// Inside an associated function without `self`, such as a type
    /// constructor. Only types, enumerators and literals are reachable.
    Static,
}

/// The module being lowered and the interner its names live in.
pub struct LowerCtx<'a> {
    interner: &'a Interner,
    module: &'a str,
}

impl<'a> LowerCtx<'a> {
    /// Creates a context for the module named `module`.
    pub fn new(interner: &'a Interner, module: &'a str) -> Self {
        Self { interner, module }
    }

    /// Returns the name of the module being lowered.
    pub fn module(&self) -> &str {
        self.module
    }

    /// Returns the module name as a host type name.
    pub fn unit_ident(&self) -> String {
        escape_ident(self.module)
    }

    /// Returns the name of the struct holding the module's signal proxies.
    pub fn io_ident(&self) -> String {
        let unit = self.unit_ident();
        format!("{}Io", unit.trim_start_matches("r#"))
    }

    /// Returns the HDL spelling of `ident`.
    ///
    /// Fails with a [`LowerError::StructuralViolation`] if the interner
    /// never issued `ident`.
    pub fn name(&self, ident: Ident) -> Result<&'a str, LowerError> {
        self.interner.try_resolve(ident).ok_or_else(|| {
            self.structural(
                format!("identifier #{}", ident.as_raw()),
                "unresolved identifier",
            )
        })
    }

    /// Returns `ident` as a host identifier.
    pub fn ident(&self, ident: Ident) -> Result<String, LowerError> {
        Ok(escape_ident(self.name(ident)?))
    }

    /// Builds a [`LowerError::StructuralViolation`] for this module.
    pub fn structural(&self, object: impl Into<String>, detail: impl Into<String>) -> LowerError {
        LowerError::StructuralViolation {
            module: self.module.to_string(),
            object: object.into(),
            detail: detail.into(),
        }
    }

    /// Builds a [`LowerError::UnsupportedConstruct`] for this module.
    pub fn unsupported(&self, object: impl Into<String>, detail: impl Into<String>) -> LowerError {
        LowerError::UnsupportedConstruct {
            module: self.module.to_string(),
            object: object.into(),
            detail: detail.into(),
        }
    }

    /// Builds a [`LowerError::CoordinationGap`] for this module.
    pub fn gap(&self, object: impl Into<String>, detail: impl Into<String>) -> LowerError {
        LowerError::CoordinationGap {
            module: self.module.to_string(),
            object: object.into(),
            detail: detail.into(),
        }
    }
}
