//! Name resolution within one module and escaping of HDL names into host
//! identifiers.

use std::collections::HashMap;

use aion_common::Ident;
use aion_hdl_ast::{HdlType, VariableDeclaration};

use crate::classify::{ClassifiedItems, TypeItem};
use crate::context::LowerCtx;
use crate::error::LowerError;

/// What a module-level name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// A non-constant port or internal signal, backed by a proxy.
    Proxy,
    /// A constant, bound as a plain value.
    Constant,
    /// A declared type.
    Type,
    /// A member of the named enumeration type.
    EnumMember {
        /// The declaring type.
        ty: Ident,
    },
}

/// Module-level name table. The first declaration of a name wins.
#[derive(Debug, Default)]
pub struct Scope {
    names: HashMap<Ident, NameKind>,
}

impl Scope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the scope of a module from its ports and classified body.
    ///
    /// Fails with [`LowerError::UnsupportedConstruct`] when two distinct
    /// names escape to the same host identifier in the same namespace:
    /// proxies, constants and instances share the constructor's locals,
    /// while types and processes share the unit's methods.
    pub fn build(
        ports: &[VariableDeclaration],
        items: &ClassifiedItems<'_>,
        ctx: &LowerCtx<'_>,
    ) -> Result<Self, LowerError> {
        let mut fields = HostNames::default();
        for var in ports.iter().chain(items.variables.iter().copied()) {
            fields.claim(var.name, ctx)?;
        }
        for instance in &items.components {
            fields.claim(instance.name, ctx)?;
        }
        let mut methods = HostNames::default();
        for ty in &items.types {
            methods.claim(ty.name(), ctx)?;
        }
        for process in &items.processes {
            methods.claim(process.label, ctx)?;
        }

        let mut scope = Self::new();
        for ty in &items.types {
            scope.insert(ty.name(), NameKind::Type);
            let members = match ty {
                TypeItem::Enum(decl) => Some(&decl.members),
                TypeItem::Alias(VariableDeclaration {
                    value: Some(aion_hdl_ast::Expr::Type(HdlType::Enum { members })),
                    ..
                }) => Some(members),
                _ => None,
            };
            for member in members.into_iter().flatten() {
                scope.insert(member.name, NameKind::EnumMember { ty: ty.name() });
            }
        }
        for var in ports.iter().chain(items.variables.iter().copied()) {
            let kind = if var.is_const {
                NameKind::Constant
            } else {
                NameKind::Proxy
            };
            scope.insert(var.name, kind);
        }
        Ok(scope)
    }

    /// Records a name unless it is already declared.
    pub fn insert(&mut self, name: Ident, kind: NameKind) {
        self.names.entry(name).or_insert(kind);
    }

    /// Looks a name up.
    pub fn get(&self, name: Ident) -> Option<NameKind> {
        self.names.get(&name).copied()
    }
}

/// Host identifiers already taken in one namespace of the generated unit.
#[derive(Default)]
struct HostNames {
    taken: HashMap<String, Ident>,
}

impl HostNames {
    fn claim(&mut self, name: Ident, ctx: &LowerCtx<'_>) -> Result<(), LowerError> {
        let host = ctx.ident(name)?;
        match self.taken.get(&host) {
            Some(&first) if first != name => Err(ctx.unsupported(
                format!("name `{}`", ctx.name(name)?),
                format!("name collides after escaping with `{}`", ctx.name(first)?),
            )),
            Some(_) => Ok(()),
            None => {
                self.taken.insert(host, name);
                Ok(())
            }
        }
    }
}

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers, plus the members every
/// generated model declares itself.
const RESERVED: &[&str] = &[
    "self",
    "Self",
    "super",
    "crate",
    "model",
    "io",
    "sim",
    "inst_name",
    "new",
    "init_body",
    "run_process",
];

/// Turns an HDL name into a valid host identifier.
///
/// Characters outside `[A-Za-z0-9_]` (VHDL extended and Verilog escaped
/// identifiers) become `_`, a leading digit gets a `_` prefix, keywords
/// become raw identifiers, and reserved names get a trailing `_`.
pub fn escape_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED.contains(&ident.as_str()) {
        ident.push('_');
        ident
    } else if RUST_KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}
