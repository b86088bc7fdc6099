//! Module definitions: the unit the lowering pass turns into one
//! simulation model.

use crate::component::ComponentInstance;
use crate::decl::{ArrayTypeDeclaration, EnumTypeDeclaration, VariableDeclaration};
use crate::expr::Expr;
use crate::process::ProcessDefinition;
use crate::stmt::Statement;
use crate::types::HdlType;
use aion_common::Ident;
use serde::{Deserialize, Serialize};

/// A generic / parameter declaration that has not been resolved yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name.
    pub name: Ident,
    /// The declared type.
    pub ty: HdlType,
    /// The default value, if any.
    pub default: Option<Expr>,
}

/// A subprogram declared inside a module body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// The function name.
    pub name: Ident,
    /// The parameter names in order.
    pub params: Vec<Ident>,
    /// The body.
    pub body: Vec<Statement>,
}

/// One object in a module body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleItem {
    /// A named enumeration type.
    EnumType(EnumTypeDeclaration),
    /// A named array type.
    ArrayType(ArrayTypeDeclaration),
    /// An internal signal, constant or type alias.
    Variable(VariableDeclaration),
    /// A process.
    Process(ProcessDefinition),
    /// A sub-module instance.
    Component(ComponentInstance),
    /// A function body.
    Function(FunctionDefinition),
}

/// A hardware module (Verilog `module`, VHDL entity + architecture).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    /// The module name.
    pub name: Ident,
    /// Documentation attached in the source, if any.
    pub doc: Option<String>,
    /// Unresolved generics. Empty once elaboration has specialized the module.
    pub params: Vec<Parameter>,
    /// The ports in declaration order.
    pub ports: Vec<VariableDeclaration>,
    /// The body objects in declaration order.
    pub items: Vec<ModuleItem>,
}

impl ModuleDefinition {
    /// Creates an empty module.
    pub fn new(name: Ident) -> Self {
        Self {
            name,
            doc: None,
            params: Vec::new(),
            ports: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Iterates over the processes in declaration order.
    pub fn processes(&self) -> impl Iterator<Item = &ProcessDefinition> {
        self.items.iter().filter_map(|item| match item {
            ModuleItem::Process(p) => Some(p),
            _ => None,
        })
    }

    /// Iterates over the component instances in declaration order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.items.iter().filter_map(|item| match item {
            ModuleItem::Component(c) => Some(c),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnumMember;

    #[test]
    fn empty_module() {
        let m = ModuleDefinition::new(Ident::from_raw(0));
        assert!(m.ports.is_empty());
        assert!(m.items.is_empty());
        assert_eq!(m.processes().count(), 0);
    }

    #[test]
    fn filtered_iterators() {
        let mut m = ModuleDefinition::new(Ident::from_raw(0));
        m.items.push(ModuleItem::EnumType(EnumTypeDeclaration {
            name: Ident::from_raw(1),
            doc: None,
            members: vec![EnumMember::bare(Ident::from_raw(2))],
        }));
        m.items.push(ModuleItem::Process(ProcessDefinition::new(
            Ident::from_raw(3),
            vec![],
            vec![],
        )));
        m.items.push(ModuleItem::Component(ComponentInstance::new(
            Ident::from_raw(4),
            Ident::from_raw(5),
            &[],
        )));
        assert_eq!(m.processes().count(), 1);
        assert_eq!(m.components().count(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let mut m = ModuleDefinition::new(Ident::from_raw(0));
        m.ports.push(VariableDeclaration::port(
            Ident::from_raw(1),
            crate::decl::PortDirection::Input,
            HdlType::bits(8, false),
        ));
        let json = serde_json::to_string(&m).unwrap();
        let back: ModuleDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
