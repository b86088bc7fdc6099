//! Sequential statements inside process bodies.

use crate::expr::Expr;
use serde::{Deserialize, Serialize};

/// One guarded branch of an if / else-if chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfBranch {
    /// The guard.
    pub condition: Expr,
    /// The statements executed when the guard holds.
    pub body: Vec<Statement>,
}

/// One arm of a multi-way select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseArm {
    /// The choices; the arm is taken when the selector equals any of them.
    pub choices: Vec<Expr>,
    /// The statements executed when the arm is taken.
    pub body: Vec<Statement>,
}

/// A behavioral statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// A signal assignment. The target may be indexed or sliced.
    Assign {
        /// The written location.
        target: Expr,
        /// The assigned value.
        value: Expr,
    },
    /// An if / else-if* / else? chain.
    If {
        /// The guarded branches, tested in order. Never empty.
        branches: Vec<IfBranch>,
        /// The fallback branch, if any.
        else_body: Option<Vec<Statement>>,
    },
    /// A switch / case statement.
    Case {
        /// The expression compared against each arm's choices.
        selector: Expr,
        /// The arms, tested in declaration order.
        arms: Vec<CaseArm>,
        /// The `default` / `when others` branch, if any.
        default: Option<Vec<Statement>>,
    },
    /// A nested `begin ... end` block.
    Block(Vec<Statement>),
    /// An empty statement (`null;`, a bare `;`).
    Null,
}

impl Statement {
    /// Shorthand for an assignment.
    pub fn assign(target: Expr, value: Expr) -> Self {
        Statement::Assign { target, value }
    }

    /// Shorthand for a single-branch `if` with an optional `else`.
    pub fn if_else(
        condition: Expr,
        then_body: Vec<Statement>,
        else_body: Option<Vec<Statement>>,
    ) -> Self {
        Statement::If {
            branches: vec![IfBranch {
                condition,
                body: then_body,
            }],
            else_body,
        }
    }
}
