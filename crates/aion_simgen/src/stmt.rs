//! Statement lowerer: process bodies to host statements.
//!
//! Conditions are evaluated through `sim_eval_cond`, which distinguishes
//! true, false and unknown. When a condition or case selector is unknown
//! every signal the construct could have written is invalidated instead of
//! picking a branch.

use std::fmt::Write;

use aion_common::Ident;
use aion_hdl_ast::{CaseArm, Expr, IfBranch, Statement};

use crate::error::LowerError;
use crate::expr::ExprLowerer;
use crate::writer::CodeWriter;

/// Lowers the statements of one process.
pub struct StmtLowerer<'e, 'a> {
    exprs: &'e ExprLowerer<'a>,
}

impl<'e, 'a> StmtLowerer<'e, 'a> {
    /// Creates a statement lowerer over a process-place expression lowerer.
    pub fn new(exprs: &'e ExprLowerer<'a>) -> Self {
        Self { exprs }
    }

    /// Lowers `stmts` in order.
    pub fn lower_block<W: Write>(
        &self,
        stmts: &[Statement],
        out: &mut CodeWriter<W>,
    ) -> Result<(), LowerError> {
        for stmt in stmts {
            self.lower_stmt(stmt, out)?;
        }
        Ok(())
    }

    fn lower_stmt<W: Write>(
        &self,
        stmt: &Statement,
        out: &mut CodeWriter<W>,
    ) -> Result<(), LowerError> {
        match stmt {
            Statement::Assign { target, value } => self.lower_assign(target, value, out),
            Statement::If {
                branches,
                else_body,
            } => self.lower_if(branches, else_body.as_deref(), out),
            Statement::Case {
                selector,
                arms,
                default,
            } => self.lower_case(selector, arms, default.as_deref(), out),
            Statement::Block(body) => self.lower_block(body, out),
            Statement::Null => Ok(()),
        }
    }

    fn lower_assign<W: Write>(
        &self,
        target: &Expr,
        value: &Expr,
        out: &mut CodeWriter<W>,
    ) -> Result<(), LowerError> {
        let value = self.exprs.value(value)?;
        let line = match target {
            Expr::Name(name) => format!("{}.write({value});", self.exprs.proxy_of(*name)?),
            Expr::Index { base, index } if base.as_name().is_some() => format!(
                "{}.write_at({}, {value});",
                self.exprs.proxy(base)?,
                self.exprs.value(index)?
            ),
            Expr::Slice { base, high, low } if base.as_name().is_some() => format!(
                "{}.write_slice({}, {}, {value});",
                self.exprs.proxy(base)?,
                self.exprs.value(high)?,
                self.exprs.value(low)?
            ),
            _ => return Err(self.exprs.unsupported("unsupported assignment target")),
        };
        out.line(line)?;
        Ok(())
    }

    fn lower_if<W: Write>(
        &self,
        branches: &[IfBranch],
        else_body: Option<&[Statement]>,
        out: &mut CodeWriter<W>,
    ) -> Result<(), LowerError> {
        let Some((first, rest)) = branches.split_first() else {
            return Err(self.exprs.structural("if statement without branches"));
        };
        let mut targets = Vec::new();
        for branch in branches {
            collect_targets(&branch.body, &mut targets);
        }
        if let Some(body) = else_body {
            collect_targets(body, &mut targets);
        }

        out.open(format!(
            "match sim_eval_cond({}) {{",
            self.exprs.value(&first.condition)?
        ))?;
        out.open("Cond::True => {")?;
        self.lower_block(&first.body, out)?;
        out.close("}")?;
        if !rest.is_empty() {
            out.open("Cond::False => {")?;
            self.lower_if(rest, else_body, out)?;
            out.close("}")?;
        } else if let Some(body) = else_body {
            out.open("Cond::False => {")?;
            self.lower_block(body, out)?;
            out.close("}")?;
        } else {
            out.line("Cond::False => {}")?;
        }
        if targets.is_empty() {
            out.line("Cond::Invalid => {}")?;
        } else {
            out.open("Cond::Invalid => {")?;
            self.invalidate(&targets, out)?;
            out.close("}")?;
        }
        out.close("}")?;
        Ok(())
    }

    fn lower_case<W: Write>(
        &self,
        selector: &Expr,
        arms: &[CaseArm],
        default: Option<&[Statement]>,
        out: &mut CodeWriter<W>,
    ) -> Result<(), LowerError> {
        warn_duplicate_choices(arms, self.exprs);
        let mut targets = Vec::new();
        for arm in arms {
            collect_targets(&arm.body, &mut targets);
        }
        if let Some(body) = default {
            collect_targets(body, &mut targets);
        }

        out.open("{")?;
        out.line(format!("let sel = {};", self.exprs.value(selector)?))?;
        out.open("if !sel.is_valid() {")?;
        self.invalidate(&targets, out)?;
        for arm in arms {
            if arm.choices.is_empty() {
                return Err(self.exprs.structural("case arm without choices"));
            }
            let tests = arm
                .choices
                .iter()
                .map(|choice| Ok(format!("sel.matches(&{})", self.exprs.value(choice)?)))
                .collect::<Result<Vec<_>, LowerError>>()?;
            out.reopen(format!("}} else if {} {{", tests.join(" || ")))?;
            self.lower_block(&arm.body, out)?;
        }
        if let Some(body) = default {
            out.reopen("} else {")?;
            self.lower_block(body, out)?;
        }
        out.close("}")?;
        out.close("}")?;
        Ok(())
    }

    fn invalidate<W: Write>(
        &self,
        targets: &[Ident],
        out: &mut CodeWriter<W>,
    ) -> Result<(), LowerError> {
        for target in targets {
            out.line(format!("{}.write_invalid();", self.exprs.proxy_of(*target)?))?;
        }
        Ok(())
    }
}

/// Appends the signals written anywhere in `stmts`, first occurrence first.
pub fn collect_targets(stmts: &[Statement], out: &mut Vec<Ident>) {
    for stmt in stmts {
        match stmt {
            Statement::Assign { target, .. } => {
                let root = match target {
                    Expr::Index { base, .. } | Expr::Slice { base, .. } => base.as_name(),
                    other => other.as_name(),
                };
                if let Some(name) = root {
                    if !out.contains(&name) {
                        out.push(name);
                    }
                }
            }
            Statement::If {
                branches,
                else_body,
            } => {
                for branch in branches {
                    collect_targets(&branch.body, out);
                }
                if let Some(body) = else_body {
                    collect_targets(body, out);
                }
            }
            Statement::Case { arms, default, .. } => {
                for arm in arms {
                    collect_targets(&arm.body, out);
                }
                if let Some(body) = default {
                    collect_targets(body, out);
                }
            }
            Statement::Block(body) => collect_targets(body, out),
            Statement::Null => {}
        }
    }
}

fn warn_duplicate_choices(arms: &[CaseArm], exprs: &ExprLowerer<'_>) {
    let choices: Vec<&Expr> = arms.iter().flat_map(|arm| &arm.choices).collect();
    for (i, choice) in choices.iter().enumerate() {
        if choices[..i].contains(choice) {
            tracing::warn!(
                module = exprs.ctx().module(),
                object = exprs.object(),
                "duplicate case choice; the first matching arm is taken"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{LowerCtx, Place};
    use crate::error::ErrorKind;
    use crate::scope::{NameKind, Scope};
    use aion_common::Interner;
    use aion_hdl_ast::{BinaryOp, Literal};

    struct Fixture {
        interner: Interner,
        scope: Scope,
    }

    impl Fixture {
        fn new() -> Self {
            let interner = Interner::new();
            let mut scope = Scope::new();
            for sig in ["a", "b", "c", "s"] {
                scope.insert(interner.get_or_intern(sig), NameKind::Proxy);
            }
            scope.insert(interner.get_or_intern("K"), NameKind::Constant);
            Self { interner, scope }
        }

        fn n(&self, name: &str) -> Expr {
            Expr::name(self.interner.get_or_intern(name))
        }

        fn lower(&self, stmts: &[Statement]) -> Result<String, LowerError> {
            let ctx = LowerCtx::new(&self.interner, "m");
            let exprs = ExprLowerer::new(&ctx, &self.scope, Place::Process, "process `p`");
            let mut out = CodeWriter::new(String::new());
            StmtLowerer::new(&exprs).lower_block(stmts, &mut out)?;
            Ok(out.into_inner())
        }
    }

    #[test]
    fn assignment_targets() {
        let f = Fixture::new();
        let out = f
            .lower(&[
                Statement::assign(f.n("c"), f.n("a")),
                Statement::assign(Expr::index(f.n("c"), Expr::int(0)), f.n("b")),
                Statement::assign(
                    Expr::slice(f.n("c"), Expr::int(7), Expr::int(4)),
                    Expr::int(0),
                ),
                Statement::Null,
            ])
            .unwrap();
        assert_eq!(
            out,
            "self.io.c.write(self.io.a.read());\n\
             self.io.c.write_at(int(0), self.io.b.read());\n\
             self.io.c.write_slice(int(7), int(4), int(0));\n"
        );
    }

    #[test]
    fn assignment_to_constant_is_unsupported() {
        let f = Fixture::new();
        let err = f
            .lower(&[Statement::assign(f.n("K"), Expr::int(1))])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConstruct);
        let err = f
            .lower(&[Statement::assign(
                Expr::Concat(vec![f.n("a"), f.n("b")]),
                Expr::int(1),
            )])
            .unwrap_err();
        assert!(err.to_string().contains("unsupported assignment target"));
    }

    #[test]
    fn if_without_else() {
        let f = Fixture::new();
        let out = f
            .lower(&[Statement::If {
                branches: vec![IfBranch {
                    condition: f.n("s"),
                    body: vec![Statement::assign(f.n("c"), f.n("a"))],
                }],
                else_body: None,
            }])
            .unwrap();
        assert_eq!(
            out,
            "match sim_eval_cond(self.io.s.read()) {\n\
             \x20   Cond::True => {\n\
             \x20       self.io.c.write(self.io.a.read());\n\
             \x20   }\n\
             \x20   Cond::False => {}\n\
             \x20   Cond::Invalid => {\n\
             \x20       self.io.c.write_invalid();\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn else_if_nests_in_false_arm() {
        let f = Fixture::new();
        let cond2 = Expr::binary(BinaryOp::Eq, f.n("a"), Expr::int(1));
        let out = f
            .lower(&[Statement::If {
                branches: vec![
                    IfBranch {
                        condition: f.n("s"),
                        body: vec![Statement::assign(f.n("c"), f.n("a"))],
                    },
                    IfBranch {
                        condition: cond2,
                        body: vec![Statement::assign(f.n("b"), f.n("a"))],
                    },
                ],
                else_body: Some(vec![Statement::assign(f.n("c"), Expr::int(0))]),
            }])
            .unwrap();
        assert_eq!(
            out,
            "match sim_eval_cond(self.io.s.read()) {\n\
             \x20   Cond::True => {\n\
             \x20       self.io.c.write(self.io.a.read());\n\
             \x20   }\n\
             \x20   Cond::False => {\n\
             \x20       match sim_eval_cond(self.io.a.read().hdl_eq(int(1))) {\n\
             \x20           Cond::True => {\n\
             \x20               self.io.b.write(self.io.a.read());\n\
             \x20           }\n\
             \x20           Cond::False => {\n\
             \x20               self.io.c.write(int(0));\n\
             \x20           }\n\
             \x20           Cond::Invalid => {\n\
             \x20               self.io.b.write_invalid();\n\
             \x20               self.io.c.write_invalid();\n\
             \x20           }\n\
             \x20       }\n\
             \x20   }\n\
             \x20   Cond::Invalid => {\n\
             \x20       self.io.c.write_invalid();\n\
             \x20       self.io.b.write_invalid();\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn case_with_default() {
        let f = Fixture::new();
        let two = Expr::Literal(Literal::Bits {
            width: 2,
            digits: "10".into(),
        });
        let out = f
            .lower(&[Statement::Case {
                selector: f.n("s"),
                arms: vec![
                    CaseArm {
                        choices: vec![Expr::int(0), Expr::int(1)],
                        body: vec![Statement::assign(f.n("c"), f.n("a"))],
                    },
                    CaseArm {
                        choices: vec![two],
                        body: vec![Statement::assign(f.n("c"), f.n("b"))],
                    },
                ],
                default: Some(vec![Statement::assign(f.n("c"), Expr::int(0))]),
            }])
            .unwrap();
        assert_eq!(
            out,
            "{\n\
             \x20   let sel = self.io.s.read();\n\
             \x20   if !sel.is_valid() {\n\
             \x20       self.io.c.write_invalid();\n\
             \x20   } else if sel.matches(&int(0)) || sel.matches(&int(1)) {\n\
             \x20       self.io.c.write(self.io.a.read());\n\
             \x20   } else if sel.matches(&bits(2, \"10\")) {\n\
             \x20       self.io.c.write(self.io.b.read());\n\
             \x20   } else {\n\
             \x20       self.io.c.write(int(0));\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn case_arm_without_choices() {
        let f = Fixture::new();
        let err = f
            .lower(&[Statement::Case {
                selector: f.n("s"),
                arms: vec![CaseArm {
                    choices: vec![],
                    body: vec![],
                }],
                default: None,
            }])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    }

    #[test]
    fn duplicate_choices_still_lower() {
        let f = Fixture::new();
        let arm = CaseArm {
            choices: vec![Expr::int(0)],
            body: vec![Statement::assign(f.n("c"), f.n("a"))],
        };
        let out = f
            .lower(&[Statement::Case {
                selector: f.n("s"),
                arms: vec![arm.clone(), arm],
                default: None,
            }])
            .unwrap();
        assert_eq!(out.matches("sel.matches(&int(0))").count(), 2);
    }

    #[test]
    fn targets_are_deduplicated_in_order() {
        let f = Fixture::new();
        let mut targets = Vec::new();
        collect_targets(
            &[
                Statement::assign(f.n("b"), Expr::int(0)),
                Statement::Block(vec![Statement::assign(
                    Expr::index(f.n("a"), Expr::int(1)),
                    Expr::int(0),
                )]),
                Statement::assign(f.n("b"), Expr::int(1)),
            ],
            &mut targets,
        );
        let names: Vec<_> = targets.iter().map(|t| f.interner.resolve(*t)).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn nested_block_is_flattened() {
        let f = Fixture::new();
        let out = f
            .lower(&[Statement::Block(vec![
                Statement::Null,
                Statement::assign(f.n("c"), Expr::int(1)),
            ])])
            .unwrap();
        assert_eq!(out, "self.io.c.write(int(1));\n");
    }
}
