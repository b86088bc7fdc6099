//! Declaration classifier: sorts a module body into the buckets the model
//! layout is built from.

use aion_common::Ident;
use aion_hdl_ast::{
    ArrayTypeDeclaration, ComponentInstance, EnumTypeDeclaration, ModuleItem, ProcessDefinition,
    VariableDeclaration,
};

use crate::context::LowerCtx;
use crate::error::LowerError;

/// A declaration that lowers to a type constructor.
#[derive(Debug, Clone, Copy)]
pub enum TypeItem<'a> {
    /// A named enumeration.
    Enum(&'a EnumTypeDeclaration),
    /// A named array.
    Array(&'a ArrayTypeDeclaration),
    /// A variable whose type is the type of types; its value is the
    /// aliased type.
    Alias(&'a VariableDeclaration),
}

impl TypeItem<'_> {
    /// The declared type name.
    pub fn name(&self) -> Ident {
        match self {
            TypeItem::Enum(decl) => decl.name,
            TypeItem::Array(decl) => decl.name,
            TypeItem::Alias(decl) => decl.name,
        }
    }

    /// Documentation attached to the declaration.
    pub fn doc(&self) -> Option<&str> {
        match self {
            TypeItem::Enum(decl) => decl.doc.as_deref(),
            TypeItem::Array(decl) => decl.doc.as_deref(),
            TypeItem::Alias(decl) => decl.doc.as_deref(),
        }
    }
}

/// A module body split by object kind. Each bucket keeps source order.
#[derive(Debug, Default)]
pub struct ClassifiedItems<'a> {
    /// Type declarations, including aliases.
    pub types: Vec<TypeItem<'a>>,
    /// Internal signals and constants.
    pub variables: Vec<&'a VariableDeclaration>,
    /// Processes.
    pub processes: Vec<&'a ProcessDefinition>,
    /// Sub-module instances.
    pub components: Vec<&'a ComponentInstance>,
}

/// Partitions `items` into type declarations, variables, processes and
/// component instances.
///
/// Fails on the first object that has no bucket.
pub fn classify_items<'a>(
    items: &'a [ModuleItem],
    ctx: &LowerCtx<'_>,
) -> Result<ClassifiedItems<'a>, LowerError> {
    let mut out = ClassifiedItems::default();
    for item in items {
        match item {
            ModuleItem::EnumType(decl) => out.types.push(TypeItem::Enum(decl)),
            ModuleItem::ArrayType(decl) => out.types.push(TypeItem::Array(decl)),
            ModuleItem::Variable(var) if var.ty.is_meta() => out.types.push(TypeItem::Alias(var)),
            ModuleItem::Variable(var) => out.variables.push(var),
            ModuleItem::Process(process) => out.processes.push(process),
            ModuleItem::Component(instance) => out.components.push(instance),
            ModuleItem::Function(function) => {
                let name = ctx.name(function.name)?;
                tracing::error!(
                    module = ctx.module(),
                    function = name,
                    "object kind has no bucket"
                );
                return Err(ctx.structural(
                    format!("function `{name}`"),
                    "object kind has no bucket",
                ));
            }
        }
    }
    tracing::trace!(
        module = ctx.module(),
        types = out.types.len(),
        variables = out.variables.len(),
        processes = out.processes.len(),
        components = out.components.len(),
        "classified module body"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use aion_common::Interner;
    use aion_hdl_ast::{EnumMember, Expr, FunctionDefinition, HdlType};

    #[test]
    fn buckets_keep_source_order() {
        let interner = Interner::new();
        let ctx = LowerCtx::new(&interner, "m");
        let a = interner.get_or_intern("a");
        let b = interner.get_or_intern("b");
        let t = interner.get_or_intern("t");
        let p = interner.get_or_intern("p");
        let u = interner.get_or_intern("u");
        let items = vec![
            ModuleItem::Variable(VariableDeclaration::signal(b, HdlType::bits(1, false))),
            ModuleItem::Process(ProcessDefinition::new(p, vec![], vec![])),
            ModuleItem::EnumType(EnumTypeDeclaration {
                name: t,
                doc: None,
                members: vec![EnumMember::bare(a)],
            }),
            ModuleItem::Variable(VariableDeclaration::signal(a, HdlType::bits(1, false))),
            ModuleItem::Component(ComponentInstance::new(u, t, &[])),
        ];
        let out = classify_items(&items, &ctx).unwrap();
        assert_eq!(out.types.len(), 1);
        assert_eq!(out.types[0].name(), t);
        let vars: Vec<_> = out.variables.iter().map(|v| v.name).collect();
        assert_eq!(vars, vec![b, a]);
        assert_eq!(out.processes.len(), 1);
        assert_eq!(out.components.len(), 1);
    }

    #[test]
    fn meta_variable_is_a_type() {
        let interner = Interner::new();
        let ctx = LowerCtx::new(&interner, "m");
        let alias = interner.get_or_intern("word_t");
        let items = vec![ModuleItem::Variable(
            VariableDeclaration::signal(alias, HdlType::Meta)
                .with_value(Expr::Type(HdlType::bits(16, false))),
        )];
        let out = classify_items(&items, &ctx).unwrap();
        assert!(out.variables.is_empty());
        assert!(matches!(out.types[0], TypeItem::Alias(_)));
    }

    #[test]
    fn function_has_no_bucket() {
        let interner = Interner::new();
        let ctx = LowerCtx::new(&interner, "m");
        let items = vec![ModuleItem::Function(FunctionDefinition {
            name: interner.get_or_intern("f"),
            params: vec![],
            body: vec![],
        })];
        let err = classify_items(&items, &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
        assert!(err.to_string().contains("object kind has no bucket"));
        assert!(err.to_string().contains("function `f`"));
    }

    #[test]
    fn empty_body() {
        let interner = Interner::new();
        let ctx = LowerCtx::new(&interner, "m");
        let out = classify_items(&[], &ctx).unwrap();
        assert!(out.types.is_empty() && out.variables.is_empty());
    }
}
