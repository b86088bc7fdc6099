//! Expression lowerer.
//!
//! Every expression lowers to a host expression over the runtime value API.
//! Infix operators are always parenthesized, so the output never depends on
//! host operator precedence. Comparisons and logical connectives lower to
//! methods because their results are 4-state booleans, not host `bool`s.

use aion_common::Ident;
use aion_hdl_ast::{BinaryOp, EdgeKind, Expr, Literal, UnaryOp};

use crate::context::{LowerCtx, Place};
use crate::error::LowerError;
use crate::scope::{NameKind, Scope};
use crate::types::lower_type;

/// Lowers expressions of one object (process, declaration, instance) in a
/// fixed evaluation place.
pub struct ExprLowerer<'a> {
    ctx: &'a LowerCtx<'a>,
    scope: &'a Scope,
    place: Place,
    object: &'a str,
}

impl<'a> ExprLowerer<'a> {
    /// Creates a lowerer for expressions belonging to `object`, e.g.
    /// "process `p0`". The object is only used in error messages.
    pub fn new(ctx: &'a LowerCtx<'a>, scope: &'a Scope, place: Place, object: &'a str) -> Self {
        Self {
            ctx,
            scope,
            place,
            object,
        }
    }

    /// The module context.
    pub fn ctx(&self) -> &'a LowerCtx<'a> {
        self.ctx
    }

    /// The module scope.
    pub fn scope(&self) -> &'a Scope {
        self.scope
    }

    /// The object whose expressions are lowered.
    pub fn object(&self) -> &'a str {
        self.object
    }

    pub(crate) fn structural(&self, detail: impl Into<String>) -> LowerError {
        self.ctx.structural(self.object, detail)
    }

    pub(crate) fn unsupported(&self, detail: impl Into<String>) -> LowerError {
        self.ctx.unsupported(self.object, detail)
    }

    /// Lowers `expr` to the signal proxy it names.
    ///
    /// Only bare names of ports and internal signals have proxies.
    pub fn proxy(&self, expr: &Expr) -> Result<String, LowerError> {
        let Some(name) = expr.as_name() else {
            return Err(self.unsupported("expression is not a signal"));
        };
        self.proxy_of(name)
    }

    /// Lowers the signal `name` to its proxy.
    pub fn proxy_of(&self, name: Ident) -> Result<String, LowerError> {
        match self.scope.get(name) {
            Some(NameKind::Proxy) => self.proxy_path(name),
            _ => Err(self.unsupported(format!(
                "`{}` is not a signal",
                self.ctx.name(name)?
            ))),
        }
    }

    fn proxy_path(&self, name: Ident) -> Result<String, LowerError> {
        let ident = self.ctx.ident(name)?;
        match self.place {
            Place::Constructor => Ok(ident),
            Place::Process => Ok(format!("self.io.{ident}")),
            Place::Static => self.not_static(name),
        }
    }

    fn not_static<T>(&self, name: Ident) -> Result<T, LowerError> {
        Err(self.unsupported(format!(
            "reference to `{}` outside the model instance",
            self.ctx.name(name)?
        )))
    }

    /// Lowers `expr` to a value.
    pub fn value(&self, expr: &Expr) -> Result<String, LowerError> {
        match expr {
            Expr::Name(name) => self.name(*name),
            Expr::Literal(lit) => self.literal(lit),
            Expr::Unary { op, operand } => {
                let operand = self.value(operand)?;
                Ok(match op {
                    UnaryOp::Not => format!("(!{operand})"),
                    UnaryOp::Neg => format!("(-{operand})"),
                    UnaryOp::LogicNot => format!("{operand}.logic_not()"),
                    UnaryOp::RedAnd => format!("{operand}.reduce_and()"),
                    UnaryOp::RedOr => format!("{operand}.reduce_or()"),
                    UnaryOp::RedXor => format!("{operand}.reduce_xor()"),
                })
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.value(lhs)?;
                let rhs = self.value(rhs)?;
                Ok(binary(*op, &lhs, &rhs))
            }
            Expr::Ternary {
                condition,
                if_true,
                if_false,
            } => Ok(format!(
                "ternary({}, {}, {})",
                self.value(condition)?,
                self.value(if_true)?,
                self.value(if_false)?
            )),
            Expr::Index { base, index } => Ok(format!(
                "{}.index({})",
                self.value(base)?,
                self.value(index)?
            )),
            Expr::Slice { base, high, low } => Ok(format!(
                "{}.slice({}, {})",
                self.value(base)?,
                self.value(high)?,
                self.value(low)?
            )),
            Expr::Concat(parts) => {
                let mut parts = parts.iter();
                let Some(first) = parts.next() else {
                    return Err(self.structural("empty concatenation"));
                };
                let mut out = self.value(first)?;
                for part in parts {
                    out = format!("{out}.concat({})", self.value(part)?);
                }
                Ok(out)
            }
            Expr::Cast { expr, ty } => Ok(format!(
                "{}.reinterpret_cast({})",
                self.value(expr)?,
                lower_type(ty, self)?
            )),
            Expr::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.value(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{}({})", self.ctx.ident(*function)?, args.join(", ")))
            }
            Expr::Edge { edge, signal } => {
                let proxy = self.proxy(signal)?;
                Ok(match edge {
                    EdgeKind::Rising => format!("{proxy}.on_rising_edge()"),
                    EdgeKind::Falling => format!("{proxy}.on_falling_edge()"),
                })
            }
            Expr::Type(ty) => lower_type(ty, self),
        }
    }

    fn name(&self, name: Ident) -> Result<String, LowerError> {
        let ident = self.ctx.ident(name)?;
        Ok(match (self.scope.get(name), self.place) {
            (Some(NameKind::Proxy), _) => format!("{}.read()", self.proxy_path(name)?),
            (Some(NameKind::Constant), Place::Constructor) => format!("{ident}.clone()"),
            (Some(NameKind::Constant), Place::Process) => format!("self.{ident}.clone()"),
            (Some(NameKind::Constant), Place::Static) => return self.not_static(name),
            (Some(NameKind::Type), _) => format!("Self::{ident}()"),
            (Some(NameKind::EnumMember { ty }), _) => format!(
                "Self::{}().member({:?})",
                self.ctx.ident(ty)?,
                self.ctx.name(name)?
            ),
            (None, _) => ident,
        })
    }

    fn literal(&self, lit: &Literal) -> Result<String, LowerError> {
        match lit {
            Literal::Int(v) => Ok(format!("int({v})")),
            Literal::Bits { width, digits } => {
                if let Some(bad) = digits
                    .chars()
                    .find(|&c| !matches!(c, '0' | '1' | 'x' | 'X' | 'z' | 'Z'))
                {
                    return Err(self.structural(format!("invalid bit-string digit `{bad}`")));
                }
                Ok(format!("bits({width}, {:?})", digits.to_ascii_lowercase()))
            }
            Literal::Bool(b) => Ok(format!("boolean({b})")),
            Literal::Str(s) => Ok(format!("string({s:?})")),
        }
    }
}

fn binary(op: BinaryOp, lhs: &str, rhs: &str) -> String {
    let infix = match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::And => "&",
        BinaryOp::Or => "|",
        BinaryOp::Xor => "^",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::Pow => return format!("{lhs}.pow({rhs})"),
        BinaryOp::Eq => return format!("{lhs}.hdl_eq({rhs})"),
        BinaryOp::Ne => return format!("{lhs}.hdl_ne({rhs})"),
        BinaryOp::Lt => return format!("{lhs}.hdl_lt({rhs})"),
        BinaryOp::Le => return format!("{lhs}.hdl_le({rhs})"),
        BinaryOp::Gt => return format!("{lhs}.hdl_gt({rhs})"),
        BinaryOp::Ge => return format!("{lhs}.hdl_ge({rhs})"),
        BinaryOp::LogicAnd => return format!("{lhs}.logic_and({rhs})"),
        BinaryOp::LogicOr => return format!("{lhs}.logic_or({rhs})"),
    };
    format!("({lhs} {infix} {rhs})")
}
