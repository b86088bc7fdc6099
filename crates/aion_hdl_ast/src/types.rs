//! Type descriptors attached to declarations and casts.
//!
//! Types are language-independent: VHDL `unsigned(7 downto 0)`, Verilog
//! `reg [7:0]` and SystemVerilog `logic [7:0]` all arrive as
//! [`HdlType::Bits`].

use crate::expr::Expr;
use aion_common::Ident;
use serde::{Deserialize, Serialize};

/// One member of an enumeration type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    /// The enumerator name.
    pub name: Ident,
    /// An explicit encoding (`IDLE = 2'b01`), if the source gave one.
    pub value: Option<Expr>,
}

impl EnumMember {
    /// Creates a bare enumerator without an explicit encoding.
    pub fn bare(name: Ident) -> Self {
        Self { name, value: None }
    }
}

/// A hardware type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HdlType {
    /// A bit vector of known width.
    Bits {
        /// The number of bits.
        width: u32,
        /// Whether arithmetic on the vector is signed.
        signed: bool,
    },
    /// An anonymous enumeration with ordered members.
    Enum {
        /// The members in declaration order.
        members: Vec<EnumMember>,
    },
    /// A fixed-size array of elements.
    Array {
        /// The element type.
        element: Box<HdlType>,
        /// The number of elements, as written in the source.
        size: Box<Expr>,
    },
    /// A reference to a type declared in the enclosing module.
    Named(Ident),
    /// The type of a type. A variable with this type is a type alias whose
    /// definition is carried in its value as [`Expr::Type`].
    Meta,
}

impl HdlType {
    /// Shorthand for a bit-vector type.
    pub fn bits(width: u32, signed: bool) -> Self {
        HdlType::Bits { width, signed }
    }

    /// Shorthand for an array type.
    pub fn array(element: HdlType, size: Expr) -> Self {
        HdlType::Array {
            element: Box::new(element),
            size: Box::new(size),
        }
    }

    /// Returns `true` for the type-of-a-type marker.
    pub fn is_meta(&self) -> bool {
        matches!(self, HdlType::Meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Literal;

    #[test]
    fn bits_shorthand() {
        assert_eq!(
            HdlType::bits(8, true),
            HdlType::Bits {
                width: 8,
                signed: true
            }
        );
    }

    #[test]
    fn array_of_bits() {
        let ty = HdlType::array(HdlType::bits(8, false), Expr::Literal(Literal::Int(4)));
        if let HdlType::Array { element, size } = &ty {
            assert_eq!(**element, HdlType::bits(8, false));
            assert_eq!(**size, Expr::Literal(Literal::Int(4)));
        } else {
            panic!("expected Array");
        }
    }

    #[test]
    fn meta_marker() {
        assert!(HdlType::Meta.is_meta());
        assert!(!HdlType::bits(1, false).is_meta());
    }

    #[test]
    fn enum_member_order_survives_serde() {
        let ty = HdlType::Enum {
            members: vec![
                EnumMember::bare(Ident::from_raw(0)),
                EnumMember::bare(Ident::from_raw(1)),
                EnumMember::bare(Ident::from_raw(2)),
            ],
        };
        let json = serde_json::to_string(&ty).unwrap();
        let back: HdlType = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, back);
    }
}
