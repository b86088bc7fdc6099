//! Process definitions (VHDL processes, Verilog `always` blocks, concurrent
//! assignments after the front end wraps them).

use crate::expr::Expr;
use crate::stmt::Statement;
use aion_common::Ident;
use serde::{Deserialize, Serialize};

/// A concurrently triggered unit of behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    /// The process label; unique within its module.
    pub label: Ident,
    /// Documentation attached in the source, if any.
    pub doc: Option<String>,
    /// The sensitivity list in source order: bare names or
    /// [`Expr::Edge`] predicates.
    pub sensitivity: Vec<Expr>,
    /// The statements of the body in order.
    pub body: Vec<Statement>,
    /// The signals this process exclusively drives.
    ///
    /// Filled in by the driver-analysis pass that runs after parsing;
    /// `None` means that pass has not annotated this process.
    pub outputs: Option<Vec<Ident>>,
}

impl ProcessDefinition {
    /// Creates a process with no annotated output set.
    pub fn new(label: Ident, sensitivity: Vec<Expr>, body: Vec<Statement>) -> Self {
        Self {
            label,
            doc: None,
            sensitivity,
            body,
            outputs: None,
        }
    }

    /// Annotates the output set.
    pub fn with_outputs(mut self, outputs: Vec<Ident>) -> Self {
        self.outputs = Some(outputs);
        self
    }

    /// Attaches documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_start_unannotated() {
        let p = ProcessDefinition::new(Ident::from_raw(0), vec![], vec![]);
        assert!(p.outputs.is_none());
        let p = p.with_outputs(vec![Ident::from_raw(4)]);
        assert_eq!(p.outputs, Some(vec![Ident::from_raw(4)]));
    }

    #[test]
    fn sensitivity_keeps_order() {
        let clk = Ident::from_raw(1);
        let rst = Ident::from_raw(2);
        let p = ProcessDefinition::new(
            Ident::from_raw(0),
            vec![Expr::rising(clk), Expr::name(rst)],
            vec![Statement::Null],
        );
        assert!(matches!(p.sensitivity[0], Expr::Edge { .. }));
        assert_eq!(p.sensitivity[1].as_name(), Some(rst));
    }
}
