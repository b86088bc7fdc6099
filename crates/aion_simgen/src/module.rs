//! Module lowerer: orchestrates the other lowerers and writes one
//! simulation model per module.
//!
//! A model is laid out as
//!
//! 1. the runtime preamble (once per session, or once per module when
//!    models live in separate files),
//! 2. the unit struct and its `Io` struct of signal proxies,
//! 3. an inherent impl with one constructor per declared type and `new`,
//!    which builds every proxy, constant and sub-unit,
//! 4. the `SimUnit` impl, whose `init_body` wires sub-unit ports, registers
//!    interfaces, processes, sub-units, sensitivities and output sets, and
//!    whose `run_process` dispatches by process index,
//! 5. an inherent impl with one method per process body.

use std::fmt::Write;

use aion_common::Interner;
use aion_hdl_ast::{ModuleDefinition, VariableDeclaration};
use serde::Serialize;

use crate::classify::{classify_items, ClassifiedItems};
use crate::config::SimModelConfig;
use crate::context::{LowerCtx, Place};
use crate::error::LowerError;
use crate::expr::ExprLowerer;
use crate::scope::Scope;
use crate::sensitivity::{analyze_sensitivity, TriggerEdge};
use crate::stmt::StmtLowerer;
use crate::types::{lower_type, lower_type_decl};
use crate::writer::CodeWriter;

/// Imports and lint settings every generated file starts with.
pub const PREAMBLE: &str = "\
// Simulation model generated by aion_simgen. Do not edit.
#![allow(dead_code, non_camel_case_types, non_snake_case, unused_imports, unused_parens)]

use aion_sim_rt::model::{connect_sim_port, SimModel, SimProxy, SimUnit, Trigger};
use aion_sim_rt::sim::{sim_eval_cond, Cond, Simulator};
use aion_sim_rt::value::{
    array3t, bits, bits3t, boolean, define_enum3t, int, string, ternary, HdlType, HdlValue,
};
";

/// One registered trigger of a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoweredTrigger {
    /// The watched signal as written in the HDL.
    pub signal: String,
    /// The transition that wakes the process.
    pub edge: TriggerEdge,
}

/// What a process was registered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoweredProcess {
    /// The process label as written in the HDL.
    pub label: String,
    /// The lowered sensitivity list, in declaration order.
    pub sensitivity: Vec<LoweredTrigger>,
    /// The signals the process may drive.
    pub outputs: Vec<String>,
}

/// Summary of a lowered module, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoweredModule {
    /// The module name.
    pub name: String,
    /// Ports then internal signals that received a proxy.
    pub interfaces: Vec<String>,
    /// Constants bound as plain values.
    pub constants: Vec<String>,
    /// Registered processes.
    pub processes: Vec<LoweredProcess>,
    /// Sub-unit instance names.
    pub units: Vec<String>,
}

/// A lowering session writing models into one sink.
///
/// The session remembers whether the shared preamble was already written,
/// so several modules can be appended to the same file.
pub struct ModelEmitter<'a, W: Write> {
    out: CodeWriter<W>,
    interner: &'a Interner,
    config: &'a SimModelConfig,
    preamble_emitted: bool,
    modules_emitted: usize,
}

impl<'a, W: Write> ModelEmitter<'a, W> {
    /// Starts a session writing to `out`.
    pub fn new(out: W, interner: &'a Interner, config: &'a SimModelConfig) -> Self {
        Self {
            out: CodeWriter::new(out),
            interner,
            config,
            preamble_emitted: false,
            modules_emitted: 0,
        }
    }

    /// Consumes the session and returns the sink.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Lowers one module and appends its model to the sink.
    ///
    /// On error the text written for this module is incomplete and the
    /// sink should be discarded.
    pub fn emit_module(&mut self, module: &ModuleDefinition) -> Result<LoweredModule, LowerError> {
        let interner = self.interner;
        let Some(name) = interner.try_resolve(module.name) else {
            let err = LowerError::StructuralViolation {
                module: format!("#{}", module.name.as_raw()),
                object: "module name".to_string(),
                detail: "unresolved identifier".to_string(),
            };
            tracing::error!(kind = %err.kind(), "{err}");
            return Err(err);
        };
        let span = tracing::debug_span!("lower_module", module = name);
        let _enter = span.enter();

        let result = self.lower(module, name);
        match &result {
            Ok(lowered) => tracing::debug!(
                interfaces = lowered.interfaces.len(),
                processes = lowered.processes.len(),
                units = lowered.units.len(),
                "lowered module"
            ),
            Err(err) => tracing::error!(kind = %err.kind(), "{err}"),
        }
        result
    }

    fn lower(
        &mut self,
        module: &ModuleDefinition,
        name: &str,
    ) -> Result<LoweredModule, LowerError> {
        let ctx = LowerCtx::new(self.interner, name);
        if let Some(param) = module.params.first() {
            return Err(ctx.gap(
                format!("generic `{}`", ctx.name(param.name)?),
                "unresolved generic",
            ));
        }
        let items = classify_items(&module.items, &ctx)?;
        let scope = Scope::build(&module.ports, &items, &ctx)?;
        let decls: Vec<&VariableDeclaration> = module
            .ports
            .iter()
            .chain(items.variables.iter().copied())
            .collect();

        if self.modules_emitted > 0 {
            self.out.blank()?;
        }
        self.modules_emitted += 1;
        self.write_preamble(&ctx, &items)?;
        self.write_structs(module, &ctx, &items, &decls)?;
        self.write_constructor(module, &ctx, &scope, &items)?;
        let lowered = self.write_sim_unit(&ctx, &scope, &items, &decls)?;
        self.write_processes(&ctx, &scope, &items)?;
        Ok(lowered)
    }

    fn write_preamble(
        &mut self,
        ctx: &LowerCtx<'_>,
        items: &ClassifiedItems<'_>,
    ) -> Result<(), LowerError> {
        if self.config.emit_shared_preamble && !self.preamble_emitted {
            for line in PREAMBLE.lines() {
                self.out.line(line)?;
            }
            self.out.blank()?;
            self.preamble_emitted = self.config.module_path_prefix.is_none();
        }
        if let Some(prefix) = &self.config.module_path_prefix {
            let mut imported: Vec<String> = Vec::new();
            for instance in &items.components {
                let module = ctx.ident(instance.module_name)?;
                if !imported.contains(&module) {
                    imported.push(module);
                }
            }
            for module in &imported {
                self.out.line(format!("use {prefix}::{module}::{module};"))?;
            }
            if !imported.is_empty() {
                self.out.blank()?;
            }
        }
        Ok(())
    }

    fn write_structs(
        &mut self,
        module: &ModuleDefinition,
        ctx: &LowerCtx<'_>,
        items: &ClassifiedItems<'_>,
        decls: &[&VariableDeclaration],
    ) -> Result<(), LowerError> {
        let unit = ctx.unit_ident();
        self.out.doc("///", module.doc.as_deref())?;
        self.out.open(format!("pub struct {unit} {{"))?;
        self.out.line("pub model: SimModel,")?;
        self.out.line(format!("pub io: {},", ctx.io_ident()))?;
        for decl in decls.iter().filter(|d| d.is_const) {
            self.out.line(format!("pub {}: HdlValue,", ctx.ident(decl.name)?))?;
        }
        for instance in &items.components {
            self.out.line(format!(
                "pub {}: {},",
                ctx.ident(instance.name)?,
                ctx.ident(instance.module_name)?
            ))?;
        }
        self.out.close("}")?;
        self.out.blank()?;

        self.out.open(format!("pub struct {} {{", ctx.io_ident()))?;
        for decl in decls.iter().filter(|d| !d.is_const) {
            self.out.line(format!("pub {}: SimProxy,", ctx.ident(decl.name)?))?;
        }
        self.out.close("}")?;
        self.out.blank()?;
        Ok(())
    }

    fn write_constructor(
        &mut self,
        module: &ModuleDefinition,
        ctx: &LowerCtx<'_>,
        scope: &Scope,
        items: &ClassifiedItems<'_>,
    ) -> Result<(), LowerError> {
        let unit = ctx.unit_ident();
        self.out.open(format!("impl {unit} {{"))?;
        for ty in &items.types {
            let object = format!("type `{}`", ctx.name(ty.name())?);
            let exprs = ExprLowerer::new(ctx, scope, Place::Static, &object);
            let body = lower_type_decl(ty, &exprs)?;
            self.out.doc("///", ty.doc())?;
            self.out.open(format!("pub fn {}() -> HdlType {{", ctx.ident(ty.name())?))?;
            self.out.line(body)?;
            self.out.close("}")?;
            self.out.blank()?;
        }

        self.out.open("pub fn new(sim: &mut Simulator, inst_name: &str) -> Self {")?;
        self.out.line("let model = SimModel::new(sim, inst_name);")?;
        if !module.ports.is_empty() {
            self.out.line("// ports")?;
            for port in &module.ports {
                self.write_declaration(port, "port", ctx, scope)?;
            }
        }
        if !items.variables.is_empty() {
            self.out.line("// internal signals")?;
            for var in &items.variables {
                let kind = if var.is_const { "constant" } else { "signal" };
                self.write_declaration(var, kind, ctx, scope)?;
            }
        }
        if !items.components.is_empty() {
            self.out.line("// component instances")?;
            for instance in &items.components {
                self.out.doc("//", instance.doc.as_deref())?;
                self.out.line(format!(
                    "let {} = {}::new(sim, {:?});",
                    ctx.ident(instance.name)?,
                    ctx.ident(instance.module_name)?,
                    ctx.name(instance.name)?
                ))?;
            }
        }

        self.out.open("Self {")?;
        self.out.line("model,")?;
        let decls = module.ports.iter().chain(items.variables.iter().copied());
        let (constants, proxies): (Vec<_>, Vec<_>) = decls.partition(|d| d.is_const);
        if proxies.is_empty() {
            self.out.line(format!("io: {} {{}},", ctx.io_ident()))?;
        } else {
            self.out.open(format!("io: {} {{", ctx.io_ident()))?;
            for decl in &proxies {
                self.out.line(format!("{},", ctx.ident(decl.name)?))?;
            }
            self.out.close("},")?;
        }
        for decl in &constants {
            self.out.line(format!("{},", ctx.ident(decl.name)?))?;
        }
        for instance in &items.components {
            self.out.line(format!("{},", ctx.ident(instance.name)?))?;
        }
        self.out.close("}")?;
        self.out.close("}")?;
        self.out.close("}")?;
        self.out.blank()?;
        Ok(())
    }

    fn write_declaration(
        &mut self,
        decl: &VariableDeclaration,
        kind: &str,
        ctx: &LowerCtx<'_>,
        scope: &Scope,
    ) -> Result<(), LowerError> {
        let object = format!("{kind} `{}`", ctx.name(decl.name)?);
        let exprs = ExprLowerer::new(ctx, scope, Place::Constructor, &object);
        let ident = ctx.ident(decl.name)?;
        self.out.doc("//", decl.doc.as_deref())?;
        if decl.is_const {
            let Some(value) = &decl.value else {
                return Err(ctx.structural(exprs.object(), "constant without a value"));
            };
            self.out.line(format!("let {ident}: HdlValue = {};", exprs.value(value)?))?;
        } else {
            let ty = lower_type(&decl.ty, &exprs)?;
            let init = match &decl.value {
                Some(value) => format!("Some({})", exprs.value(value)?),
                None => "None".to_string(),
            };
            self.out.line(format!(
                "let {ident} = SimProxy::new(sim, &model, {:?}, {ty}, {init});",
                ctx.name(decl.name)?
            ))?;
        }
        Ok(())
    }

    fn write_sim_unit(
        &mut self,
        ctx: &LowerCtx<'_>,
        scope: &Scope,
        items: &ClassifiedItems<'_>,
        decls: &[&VariableDeclaration],
    ) -> Result<LoweredModule, LowerError> {
        let unit = ctx.unit_ident();
        let mut lowered = LoweredModule {
            name: ctx.module().to_string(),
            interfaces: Vec::new(),
            constants: Vec::new(),
            processes: Vec::with_capacity(items.processes.len()),
            units: Vec::with_capacity(items.components.len()),
        };

        self.out.open(format!("impl SimUnit for {unit} {{"))?;
        self.out.open("fn model(&mut self) -> &mut SimModel {")?;
        self.out.line("&mut self.model")?;
        self.out.close("}")?;
        self.out.blank()?;

        self.out.open("fn init_body(&mut self) {")?;
        for instance in &items.components {
            let object = format!("instance `{}`", ctx.name(instance.name)?);
            let exprs = ExprLowerer::new(ctx, scope, Place::Process, &object);
            let field = ctx.ident(instance.name)?;
            for binding in &instance.port_map {
                self.out.line(format!(
                    "connect_sim_port(&{}, &mut self.{field}.io.{});",
                    exprs.proxy_of(binding.signal)?,
                    ctx.ident(binding.port)?
                ))?;
            }
        }

        let mut interfaces = Vec::new();
        for decl in decls {
            let name = ctx.name(decl.name)?.to_string();
            if decl.is_const {
                lowered.constants.push(name);
            } else {
                interfaces.push(format!("self.io.{}.clone()", ctx.ident(decl.name)?));
                lowered.interfaces.push(name);
            }
        }
        self.out.line(format!("self.model.set_interfaces(vec![{}]);", interfaces.join(", ")))?;

        let labels = items
            .processes
            .iter()
            .map(|p| Ok(format!("{:?}", ctx.name(p.label)?)))
            .collect::<Result<Vec<_>, LowerError>>()?;
        self.out.line(format!("self.model.set_processes(&[{}]);", labels.join(", ")))?;

        let mut units = Vec::with_capacity(items.components.len());
        for instance in &items.components {
            units.push(format!("self.{}.model.clone()", ctx.ident(instance.name)?));
            lowered.units.push(ctx.name(instance.name)?.to_string());
        }
        self.out.line(format!("self.model.set_units(vec![{}]);", units.join(", ")))?;

        for process in &items.processes {
            let label = ctx.name(process.label)?;
            let object = format!("process `{label}`");
            let exprs = ExprLowerer::new(ctx, scope, Place::Process, &object);
            let sensitivity = analyze_sensitivity(process, &exprs)?;
            let triggers = sensitivity
                .iter()
                .map(|record| record.to_trigger(&exprs))
                .collect::<Result<Vec<_>, _>>()?;
            let Some(outputs) = &process.outputs else {
                return Err(ctx.gap(exprs.object(), "missing output-set"));
            };
            let proxies = outputs
                .iter()
                .map(|o| Ok(format!("{}.clone()", exprs.proxy_of(*o)?)))
                .collect::<Result<Vec<_>, LowerError>>()?;
            self.out.line(format!(
                "self.model.set_sensitivity({label:?}, vec![{}]);",
                triggers.join(", ")
            ))?;
            self.out.line(format!(
                "self.model.set_outputs({label:?}, vec![{}]);",
                proxies.join(", ")
            ))?;
            lowered.processes.push(LoweredProcess {
                label: label.to_string(),
                sensitivity: sensitivity
                    .iter()
                    .map(|record| {
                        Ok(LoweredTrigger {
                            signal: ctx.name(record.signal)?.to_string(),
                            edge: record.edge,
                        })
                    })
                    .collect::<Result<_, LowerError>>()?,
                outputs: outputs
                    .iter()
                    .map(|o| Ok(ctx.name(*o)?.to_string()))
                    .collect::<Result<_, LowerError>>()?,
            });
        }

        for instance in &items.components {
            self.out.line(format!("self.{}.init_body();", ctx.ident(instance.name)?))?;
        }
        self.out.close("}")?;
        self.out.blank()?;

        self.out.open("fn run_process(&mut self, index: usize) {")?;
        self.out.open("match index {")?;
        for (index, process) in items.processes.iter().enumerate() {
            self.out.line(format!("{index} => self.{}(),", ctx.ident(process.label)?))?;
        }
        self.out.line(format!("_ => unreachable!(\"{unit} has no process {{index}}\"),"))?;
        self.out.close("}")?;
        self.out.close("}")?;
        self.out.close("}")?;
        Ok(lowered)
    }

    fn write_processes(
        &mut self,
        ctx: &LowerCtx<'_>,
        scope: &Scope,
        items: &ClassifiedItems<'_>,
    ) -> Result<(), LowerError> {
        if items.processes.is_empty() {
            return Ok(());
        }
        self.out.blank()?;
        self.out.open(format!("impl {} {{", ctx.unit_ident()))?;
        for (i, process) in items.processes.iter().enumerate() {
            if i > 0 {
                self.out.blank()?;
            }
            let label = ctx.name(process.label)?;
            let object = format!("process `{label}`");
            let exprs = ExprLowerer::new(ctx, scope, Place::Process, &object);
            self.out.doc("///", process.doc.as_deref())?;
            self.out.open(format!("pub fn {}(&mut self) {{", ctx.ident(process.label)?))?;
            StmtLowerer::new(&exprs).lower_block(&process.body, &mut self.out)?;
            self.out.close("}")?;
            tracing::debug!(
                process = label,
                statements = process.body.len(),
                "lowered process"
            );
        }
        self.out.close("}")?;
        Ok(())
    }
}
