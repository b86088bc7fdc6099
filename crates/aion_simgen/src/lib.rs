//! Simulation-model generator for the Aion FPGA toolchain.
//!
//! Lowers elaborated HDL modules ([`aion_hdl_ast::ModuleDefinition`]) into
//! Rust source for the event-driven `aion_sim_rt` runtime. Each module
//! becomes a unit struct holding one signal proxy per port and internal
//! signal, a constructor building those proxies and all sub-units, an
//! `init_body` registering processes with their sensitivity lists and
//! output sets, and one method per process body.
//!
//! Lowering is a single pass over each module. The first unsupported or
//! malformed construct aborts that module with a [`LowerError`]; no partial
//! model is ever reported as a success.
//!
//! # Example
//!
//! ```
//! use aion_common::Interner;
//! use aion_hdl_ast::{BinaryOp, Expr, HdlType, ModuleDefinition, ModuleItem,
//!     PortDirection, ProcessDefinition, Statement, VariableDeclaration};
//! use aion_simgen::{lower_module, SimModelConfig};
//!
//! let interner = Interner::new();
//! let [a, b, c] = ["a", "b", "c"].map(|n| interner.get_or_intern(n));
//! let mut adder = ModuleDefinition::new(interner.get_or_intern("adder"));
//! adder.ports = vec![
//!     VariableDeclaration::port(a, PortDirection::Input, HdlType::bits(8, false)),
//!     VariableDeclaration::port(b, PortDirection::Input, HdlType::bits(8, false)),
//!     VariableDeclaration::port(c, PortDirection::Output, HdlType::bits(8, false)),
//! ];
//! let sum = Expr::binary(BinaryOp::Add, Expr::name(a), Expr::name(b));
//! adder.items.push(ModuleItem::Process(
//!     ProcessDefinition::new(
//!         interner.get_or_intern("comb"),
//!         vec![Expr::name(a), Expr::name(b)],
//!         vec![Statement::assign(Expr::name(c), sum)],
//!     )
//!     .with_outputs(vec![c]),
//! ));
//!
//! let mut out = String::new();
//! let lowered = lower_module(&adder, &interner, &SimModelConfig::default(), &mut out).unwrap();
//! assert_eq!(lowered.processes[0].outputs, vec!["c"]);
//! assert!(out.contains("self.io.c.write((self.io.a.read() + self.io.b.read()));"));
//! ```

#![warn(missing_docs)]

pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod expr;
pub mod module;
pub mod scope;
pub mod sensitivity;
pub mod stmt;
pub mod types;
pub mod writer;

use std::fmt::Write;

use aion_common::Interner;
use aion_hdl_ast::ModuleDefinition;

pub use config::{load_config, load_config_from_str, ConfigError, SimModelConfig};
pub use error::{ErrorKind, LowerError};
pub use module::{LoweredModule, LoweredProcess, LoweredTrigger, ModelEmitter, PREAMBLE};
pub use sensitivity::{SensitivityRecord, TriggerEdge};

/// Lowers a single module into `out`.
pub fn lower_module<W: Write>(
    module: &ModuleDefinition,
    interner: &Interner,
    config: &SimModelConfig,
    out: W,
) -> Result<LoweredModule, LowerError> {
    let mut emitter = ModelEmitter::new(out, interner, config);
    emitter.emit_module(module)
}

/// Lowers `modules` in order into one sink, sharing the preamble.
///
/// Emitted items do not depend on each other's position, so sub-modules may
/// come before or after the modules instantiating them. Stops at the first
/// module that fails.
pub fn lower_design<W: Write>(
    modules: &[ModuleDefinition],
    interner: &Interner,
    config: &SimModelConfig,
    out: W,
) -> Result<Vec<LoweredModule>, LowerError> {
    let mut emitter = ModelEmitter::new(out, interner, config);
    let lowered = modules
        .iter()
        .map(|module| emitter.emit_module(module))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(modules = lowered.len(), "lowered design");
    Ok(lowered)
}
