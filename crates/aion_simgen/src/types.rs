//! Type lowerer: HDL type descriptors to runtime type constructors.

use aion_hdl_ast::{EnumMember, Expr, HdlType};

use crate::classify::TypeItem;
use crate::error::LowerError;
use crate::expr::ExprLowerer;
use crate::scope::NameKind;

/// Lowers a type used by a declaration or cast.
pub fn lower_type(ty: &HdlType, exprs: &ExprLowerer<'_>) -> Result<String, LowerError> {
    match ty {
        HdlType::Bits { width, signed } => Ok(format!("bits3t({width}, {signed})")),
        HdlType::Array { element, size } => {
            let element = lower_type(element, exprs)?;
            let size = exprs.value(size)?;
            Ok(format!("array3t({element}, {size})"))
        }
        HdlType::Named(name) => {
            let ident = exprs.ctx().ident(*name)?;
            match exprs.scope().get(*name) {
                Some(NameKind::Type) => Ok(format!("Self::{ident}()")),
                _ => Ok(format!("{ident}()")),
            }
        }
        HdlType::Enum { .. } => Err(exprs.unsupported("anonymous enum type")),
        HdlType::Meta => Err(exprs.unsupported("type of types outside a type declaration")),
    }
}

/// Lowers a named type declaration to the body of its constructor.
pub fn lower_type_decl(item: &TypeItem<'_>, exprs: &ExprLowerer<'_>) -> Result<String, LowerError> {
    let name = exprs.ctx().name(item.name())?;
    match item {
        TypeItem::Enum(decl) => lower_enum(name, &decl.members, exprs),
        TypeItem::Array(decl) => {
            let element = lower_type(&decl.element, exprs)?;
            let size = exprs.value(&decl.size)?;
            Ok(format!("array3t({element}, {size})"))
        }
        TypeItem::Alias(decl) => match &decl.value {
            Some(Expr::Type(HdlType::Enum { members })) => lower_enum(name, members, exprs),
            Some(Expr::Type(HdlType::Meta)) | None => {
                Err(exprs.structural("type alias without a type value"))
            }
            Some(Expr::Type(ty)) => lower_type(ty, exprs),
            Some(_) => Err(exprs.structural("type alias without a type value")),
        },
    }
}

fn lower_enum(
    name: &str,
    members: &[EnumMember],
    exprs: &ExprLowerer<'_>,
) -> Result<String, LowerError> {
    let mut names = Vec::with_capacity(members.len());
    for member in members {
        if member.value.is_some() {
            return Err(exprs.unsupported("unsupported enum value"));
        }
        names.push(format!("{:?}", exprs.ctx().name(member.name)?));
    }
    Ok(format!("define_enum3t({name:?}, &[{}])", names.join(", ")))
}
