//! Language-neutral HDL AST for simulation-model generation.
//!
//! The Verilog, SystemVerilog and VHDL front ends all produce the same shape:
//! a [`ModuleDefinition`] holding ordered ports and an ordered list of
//! [`ModuleItem`]s (types, signals, processes, component instances). The tree
//! is an immutable snapshot; consumers only read it.
//!
//! Every node kind is a closed enum so that a consumer's `match` stops
//! compiling when a new construct is added here.

#![warn(missing_docs)]

pub mod component;
pub mod decl;
pub mod expr;
pub mod module;
pub mod process;
pub mod stmt;
pub mod types;

pub use component::{ComponentInstance, PortBinding};
pub use decl::{ArrayTypeDeclaration, EnumTypeDeclaration, PortDirection, VariableDeclaration};
pub use expr::{BinaryOp, EdgeKind, Expr, Literal, UnaryOp};
pub use module::{FunctionDefinition, ModuleDefinition, ModuleItem, Parameter};
pub use process::ProcessDefinition;
pub use stmt::{CaseArm, IfBranch, Statement};
pub use types::{EnumMember, HdlType};
