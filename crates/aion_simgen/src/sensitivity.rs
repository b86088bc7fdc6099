//! Sensitivity analyzer: turns a process's trigger list into edge-tagged
//! records.

use aion_common::Ident;
use aion_hdl_ast::{EdgeKind, Expr, ProcessDefinition};
use serde::Serialize;

use crate::error::LowerError;
use crate::expr::ExprLowerer;

/// The transition of a signal that wakes a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TriggerEdge {
    /// Any value change.
    AnyChange,
    /// A `0 -> 1` transition.
    Rising,
    /// A `1 -> 0` transition.
    Falling,
}

/// One entry of a lowered sensitivity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensitivityRecord {
    /// The watched signal.
    pub signal: Ident,
    /// The transition that triggers.
    pub edge: TriggerEdge,
}

impl SensitivityRecord {
    /// Renders the record as a runtime trigger over the signal's proxy.
    pub fn to_trigger(&self, exprs: &ExprLowerer<'_>) -> Result<String, LowerError> {
        let proxy = exprs.proxy_of(self.signal)?;
        Ok(match self.edge {
            TriggerEdge::AnyChange => format!("Trigger::any(&{proxy})"),
            TriggerEdge::Rising => format!("Trigger::rising(&{proxy})"),
            TriggerEdge::Falling => format!("Trigger::falling(&{proxy})"),
        })
    }
}

/// Tags every entry of the process's sensitivity list, in order.
///
/// An entry is either a bare signal name (any change) or an edge predicate
/// applied to a bare signal name.
pub fn analyze_sensitivity(
    process: &ProcessDefinition,
    exprs: &ExprLowerer<'_>,
) -> Result<Vec<SensitivityRecord>, LowerError> {
    process
        .sensitivity
        .iter()
        .map(|entry| {
            let (signal, edge) = match entry {
                Expr::Name(signal) => (Some(*signal), TriggerEdge::AnyChange),
                Expr::Edge {
                    edge: EdgeKind::Rising,
                    signal,
                } => (signal.as_name(), TriggerEdge::Rising),
                Expr::Edge {
                    edge: EdgeKind::Falling,
                    signal,
                } => (signal.as_name(), TriggerEdge::Falling),
                _ => (None, TriggerEdge::AnyChange),
            };
            match signal {
                Some(signal) => Ok(SensitivityRecord { signal, edge }),
                None => Err(exprs.structural("unrecognized sensitivity operator")),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{LowerCtx, Place};
    use crate::error::ErrorKind;
    use crate::scope::{NameKind, Scope};
    use aion_common::Interner;
    use aion_hdl_ast::{BinaryOp, UnaryOp};

    #[test]
    fn tags_in_declaration_order() {
        let interner = Interner::new();
        let ctx = LowerCtx::new(&interner, "m");
        let scope = Scope::new();
        let exprs = ExprLowerer::new(&ctx, &scope, Place::Process, "process `p`");
        let clk = interner.get_or_intern("clk");
        let rst = interner.get_or_intern("rst");
        let a = interner.get_or_intern("a");
        let p = ProcessDefinition::new(
            interner.get_or_intern("p"),
            vec![Expr::rising(clk), Expr::falling(rst), Expr::name(a)],
            vec![],
        );
        let records = analyze_sensitivity(&p, &exprs).unwrap();
        assert_eq!(
            records,
            vec![
                SensitivityRecord {
                    signal: clk,
                    edge: TriggerEdge::Rising
                },
                SensitivityRecord {
                    signal: rst,
                    edge: TriggerEdge::Falling
                },
                SensitivityRecord {
                    signal: a,
                    edge: TriggerEdge::AnyChange
                },
            ]
        );
    }

    #[test]
    fn empty_list() {
        let interner = Interner::new();
        let ctx = LowerCtx::new(&interner, "m");
        let scope = Scope::new();
        let exprs = ExprLowerer::new(&ctx, &scope, Place::Process, "process `p`");
        let p = ProcessDefinition::new(interner.get_or_intern("p"), vec![], vec![]);
        assert!(analyze_sensitivity(&p, &exprs).unwrap().is_empty());
    }

    #[test]
    fn other_operators_are_rejected() {
        let interner = Interner::new();
        let ctx = LowerCtx::new(&interner, "m");
        let scope = Scope::new();
        let exprs = ExprLowerer::new(&ctx, &scope, Place::Process, "process `p`");
        let a = Expr::name(interner.get_or_intern("a"));
        for entry in [
            Expr::unary(UnaryOp::Not, a.clone()),
            Expr::binary(BinaryOp::Or, a.clone(), a.clone()),
            Expr::Edge {
                edge: EdgeKind::Rising,
                signal: Box::new(Expr::index(a.clone(), Expr::int(0))),
            },
        ] {
            let p = ProcessDefinition::new(interner.get_or_intern("p"), vec![entry], vec![]);
            let err = analyze_sensitivity(&p, &exprs).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::StructuralViolation);
            assert!(err.to_string().contains("unrecognized sensitivity operator"));
        }
    }

    #[test]
    fn triggers_render_over_proxies() {
        let interner = Interner::new();
        let ctx = LowerCtx::new(&interner, "m");
        let clk = interner.get_or_intern("clk");
        let mut scope = Scope::new();
        scope.insert(clk, NameKind::Proxy);
        let exprs = ExprLowerer::new(&ctx, &scope, Place::Process, "process `p`");
        let record = SensitivityRecord {
            signal: clk,
            edge: TriggerEdge::Rising,
        };
        assert_eq!(
            record.to_trigger(&exprs).unwrap(),
            "Trigger::rising(&self.io.clk)"
        );
    }
}
