//! Port, signal, constant and named-type declarations.

use crate::expr::Expr;
use crate::types::{EnumMember, HdlType};
use aion_common::Ident;
use serde::{Deserialize, Serialize};

/// The direction of a port on a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Data flows into the module.
    Input,
    /// Data flows out of the module.
    Output,
    /// Data flows both ways.
    InOut,
}

/// A port, internal signal, constant or type alias.
///
/// Ports are the declarations with a `direction`. A declaration whose type is
/// [`HdlType::Meta`] is a type alias and carries its definition in `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    /// The declared name.
    pub name: Ident,
    /// Documentation attached in the source, if any.
    pub doc: Option<String>,
    /// The declared type.
    pub ty: HdlType,
    /// The initial (or constant) value.
    pub value: Option<Expr>,
    /// Whether this is a constant rather than a signal.
    pub is_const: bool,
    /// Set for ports only.
    pub direction: Option<PortDirection>,
}

impl VariableDeclaration {
    /// Creates an internal signal without an initial value.
    pub fn signal(name: Ident, ty: HdlType) -> Self {
        Self {
            name,
            doc: None,
            ty,
            value: None,
            is_const: false,
            direction: None,
        }
    }

    /// Creates a port.
    pub fn port(name: Ident, direction: PortDirection, ty: HdlType) -> Self {
        Self {
            direction: Some(direction),
            ..Self::signal(name, ty)
        }
    }

    /// Creates a constant.
    pub fn constant(name: Ident, ty: HdlType, value: Expr) -> Self {
        Self {
            value: Some(value),
            is_const: true,
            ..Self::signal(name, ty)
        }
    }

    /// Sets the initial value.
    pub fn with_value(mut self, value: Expr) -> Self {
        self.value = Some(value);
        self
    }

    /// Attaches documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Returns `true` if this declaration is a port.
    pub fn is_port(&self) -> bool {
        self.direction.is_some()
    }
}

/// A named enumeration type (`type state_t is (IDLE, RUN);`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumTypeDeclaration {
    /// The type name.
    pub name: Ident,
    /// Documentation attached in the source, if any.
    pub doc: Option<String>,
    /// The members in declaration order.
    pub members: Vec<EnumMember>,
}

/// A named fixed-size array type (`type mem_t is array (0 to 3) of byte;`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayTypeDeclaration {
    /// The type name.
    pub name: Ident,
    /// Documentation attached in the source, if any.
    pub doc: Option<String>,
    /// The element type.
    pub element: HdlType,
    /// The number of elements, as written in the source.
    pub size: Expr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_has_direction() {
        let p = VariableDeclaration::port(
            Ident::from_raw(0),
            PortDirection::Output,
            HdlType::bits(8, false),
        );
        assert!(p.is_port());
        assert!(!p.is_const);
        assert_eq!(p.direction, Some(PortDirection::Output));
    }

    #[test]
    fn constant_carries_value() {
        let c = VariableDeclaration::constant(
            Ident::from_raw(1),
            HdlType::bits(32, false),
            Expr::int(123),
        );
        assert!(c.is_const);
        assert!(!c.is_port());
        assert_eq!(c.value, Some(Expr::int(123)));
    }

    #[test]
    fn builder_methods() {
        let s = VariableDeclaration::signal(Ident::from_raw(2), HdlType::bits(1, false))
            .with_value(Expr::int(0))
            .with_doc("reset register");
        assert_eq!(s.value, Some(Expr::int(0)));
        assert_eq!(s.doc.as_deref(), Some("reset register"));
    }

    #[test]
    fn port_directions_distinct() {
        assert_ne!(PortDirection::Input, PortDirection::Output);
        assert_ne!(PortDirection::Output, PortDirection::InOut);
        assert_ne!(PortDirection::Input, PortDirection::InOut);
    }
}
