//! Expression trees.
//!
//! [`Expr`] covers everything that can appear on the right-hand side of an
//! assignment, in a condition, in a sensitivity list, or as a type size.

use crate::types::HdlType;
use aion_common::Ident;
use serde::{Deserialize, Serialize};

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Bitwise NOT (`~` / `not`).
    Not,
    /// Arithmetic negation (`-`).
    Neg,
    /// Logical NOT (`!`).
    LogicNot,
    /// Reduction AND (`&x`).
    RedAnd,
    /// Reduction OR (`|x`).
    RedOr,
    /// Reduction XOR (`^x`).
    RedXor,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Modulo (`%` / `mod`).
    Mod,
    /// Exponentiation (`**`).
    Pow,
    /// Bitwise AND (`&` / `and`).
    And,
    /// Bitwise OR (`|` / `or`).
    Or,
    /// Bitwise XOR (`^` / `xor`).
    Xor,
    /// Left shift (`<<` / `sll`).
    Shl,
    /// Right shift (`>>` / `srl`).
    Shr,
    /// Equality (`==` / `=`).
    Eq,
    /// Inequality (`!=` / `/=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Logical AND (`&&`).
    LogicAnd,
    /// Logical OR (`||`).
    LogicOr,
}

/// The transition an edge predicate tests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// `rising_edge(x)` / `posedge x`.
    Rising,
    /// `falling_edge(x)` / `negedge x`.
    Falling,
}

/// A literal constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    /// An unsized integer (`42`, `16#FF#`).
    Int(i64),
    /// A sized bit string with 4-state digits, most significant first
    /// (`4'b01xz`, `"01XZ"`).
    Bits {
        /// The declared width in bits.
        width: u32,
        /// One `0`, `1`, `x` or `z` character per bit.
        digits: String,
    },
    /// A boolean (`true` / `false`).
    Bool(bool),
    /// A string literal.
    Str(String),
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A reference to a port, signal, constant, type or enumerator.
    Name(Ident),
    /// A literal constant.
    Literal(Literal),
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left-hand operand.
        lhs: Box<Expr>,
        /// The right-hand operand.
        rhs: Box<Expr>,
    },
    /// A conditional expression (`c ? a : b`, `a when c else b`).
    Ternary {
        /// The condition.
        condition: Box<Expr>,
        /// The value when the condition holds.
        if_true: Box<Expr>,
        /// The value otherwise.
        if_false: Box<Expr>,
    },
    /// A single-element index (`x[i]`, `x(i)`).
    Index {
        /// The indexed expression.
        base: Box<Expr>,
        /// The index.
        index: Box<Expr>,
    },
    /// A range select (`x[7:0]`, `x(7 downto 0)`). Bounds are kept as written.
    Slice {
        /// The sliced expression.
        base: Box<Expr>,
        /// The high bound.
        high: Box<Expr>,
        /// The low bound.
        low: Box<Expr>,
    },
    /// A concatenation, most significant part first.
    Concat(Vec<Expr>),
    /// A reinterpretation of the operand's bit pattern as another type.
    Cast {
        /// The operand.
        expr: Box<Expr>,
        /// The target type.
        ty: HdlType,
    },
    /// A function call.
    Call {
        /// The called function.
        function: Ident,
        /// The arguments in order.
        args: Vec<Expr>,
    },
    /// An edge predicate on a signal.
    Edge {
        /// Which transition is tested.
        edge: EdgeKind,
        /// The signal being watched.
        signal: Box<Expr>,
    },
    /// A type used in value position (the value of a type alias).
    Type(HdlType),
}

impl Expr {
    /// Shorthand for a name reference.
    pub fn name(ident: Ident) -> Self {
        Expr::Name(ident)
    }

    /// Shorthand for an integer literal.
    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::Int(value))
    }

    /// Shorthand for a binary operation.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Shorthand for a unary operation.
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Shorthand for an index.
    pub fn index(base: Expr, index: Expr) -> Self {
        Expr::Index {
            base: Box::new(base),
            index: Box::new(index),
        }
    }

    /// Shorthand for a slice.
    pub fn slice(base: Expr, high: Expr, low: Expr) -> Self {
        Expr::Slice {
            base: Box::new(base),
            high: Box::new(high),
            low: Box::new(low),
        }
    }

    /// Shorthand for a reinterpretation cast.
    pub fn cast(expr: Expr, ty: HdlType) -> Self {
        Expr::Cast {
            expr: Box::new(expr),
            ty,
        }
    }

    /// Shorthand for `rising_edge(signal)`.
    pub fn rising(signal: Ident) -> Self {
        Expr::Edge {
            edge: EdgeKind::Rising,
            signal: Box::new(Expr::Name(signal)),
        }
    }

    /// Shorthand for `falling_edge(signal)`.
    pub fn falling(signal: Ident) -> Self {
        Expr::Edge {
            edge: EdgeKind::Falling,
            signal: Box::new(Expr::Name(signal)),
        }
    }

    /// Returns the referenced name if this is a bare [`Expr::Name`].
    pub fn as_name(&self) -> Option<Ident> {
        match self {
            Expr::Name(id) => Some(*id),
            _ => None,
        }
    }
}
