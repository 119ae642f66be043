use num::Float;

use crate::definition::Condition;
use crate::error::{ConfigError, ConfigResult};
use crate::ops::{AndOp, OrOp};
use crate::terms::TermId;
use crate::variable::{Role, VariableKey, Variables};

/// A rule premise with every name resolved against the system's variables
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    Is(VariableKey, TermId),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    /// Resolve a named condition. `rule` is only used for error reporting.
    pub(crate) fn resolve(condition: &Condition, vars: &Variables, rule: usize) -> ConfigResult<Self> {
        match condition {
            Condition::Is(prop) => {
                let key = vars
                    .key(&prop.variable)
                    .filter(|key| vars[*key].role() == Role::Antecedent)
                    .ok_or_else(|| ConfigError::UnknownVariable {
                        rule,
                        variable: prop.variable.clone(),
                    })?;
                let term = vars[key].term_id(&prop.term).ok_or_else(|| ConfigError::UnknownTerm {
                    rule,
                    variable: prop.variable.clone(),
                    term: prop.term.clone(),
                })?;

                Ok(Expr::Is(key, term))
            },
            Condition::Any { any } => Ok(Expr::Or(Self::resolve_all(any, vars, rule)?)),
            Condition::All { all } => Ok(Expr::And(Self::resolve_all(all, vars, rule)?)),
        }
    }

    fn resolve_all(conditions: &[Condition], vars: &Variables, rule: usize) -> ConfigResult<Vec<Self>> {
        if conditions.is_empty() {
            return Err(ConfigError::EmptyCondition { rule });
        }

        conditions.iter().map(|c| Self::resolve(c, vars, rule)).collect()
    }

    pub(crate) fn propositions(&self) -> Vec<(VariableKey, TermId)> {
        let mut props = Vec::new();

        fn parse(expr: &Expr, out: &mut Vec<(VariableKey, TermId)>) {
            match expr {
                Expr::Is(var_key, term) => out.push((*var_key, *term)),
                Expr::And(exprs) | Expr::Or(exprs) => {
                    for expr in exprs {
                        parse(expr, out);
                    }
                },
            }
        }

        parse(self, &mut props);

        props
    }

    /// Firing strength of the premise, given the degree of each proposition
    pub(crate) fn eval<F: Float>(&self, degree: &impl Fn(VariableKey, TermId) -> F, and_op: AndOp, or_op: OrOp) -> F {
        match self {
            Expr::Is(var_key, term) => degree(*var_key, *term),
            Expr::And(exprs) => exprs
                .iter()
                .fold(and_op.identity(), |acc, e| and_op.apply(acc, e.eval(degree, and_op, or_op))),
            Expr::Or(exprs) => exprs
                .iter()
                .fold(or_op.identity(), |acc, e| or_op.apply(acc, e.eval(degree, and_op, or_op))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{UniverseDefinition, VariableDefinition};
    use crate::variable::LinguisticVariable;

    fn vars() -> (Variables, VariableKey, VariableKey) {
        let mut vars = Variables::with_capacity(3);
        let speed = vars
            .insert(
                LinguisticVariable::from_definition(
                    &VariableDefinition::new("speed", UniverseDefinition::new(0., 10., 1.))
                        .term("low", [0., 0., 5.])
                        .term("high", [5., 10., 10.]),
                    Role::Antecedent,
                )
                .unwrap(),
            )
            .unwrap();
        let wear = vars
            .insert(
                LinguisticVariable::from_definition(
                    &VariableDefinition::new("wear", UniverseDefinition::new(0., 10., 1.)).term("high", [3., 8., 10.]),
                    Role::Antecedent,
                )
                .unwrap(),
            )
            .unwrap();
        vars.insert(
            LinguisticVariable::from_definition(
                &VariableDefinition::new("failure", UniverseDefinition::new(0., 1., 1.)).term("yes", [0., 1., 1.]),
                Role::Consequent,
            )
            .unwrap(),
        )
        .unwrap();

        (vars, speed, wear)
    }

    #[test]
    fn test_resolve_nested_condition() {
        let (vars, speed, wear) = vars();
        let condition = Condition::any([
            Condition::is("speed", "high"),
            Condition::all([Condition::is("speed", "low"), Condition::is("wear", "high")]),
        ]);

        let expr = Expr::resolve(&condition, &vars, 0).unwrap();

        assert_eq!(
            expr,
            Expr::Or(vec![
                Expr::Is(speed, TermId(1)),
                Expr::And(vec![Expr::Is(speed, TermId(0)), Expr::Is(wear, TermId(0))]),
            ])
        );
        assert_eq!(
            expr.propositions(),
            vec![(speed, TermId(1)), (speed, TermId(0)), (wear, TermId(0))]
        );
    }

    #[test]
    fn test_resolve_rejects_dangling_names() {
        let (vars, _, _) = vars();

        assert_eq!(
            Expr::resolve(&Condition::is("torque", "low"), &vars, 2),
            Err(ConfigError::UnknownVariable {
                rule: 2,
                variable: "torque".into()
            })
        );
        assert_eq!(
            Expr::resolve(&Condition::is("wear", "low"), &vars, 0),
            Err(ConfigError::UnknownTerm {
                rule: 0,
                variable: "wear".into(),
                term: "low".into()
            })
        );
        // The consequent cannot appear in a premise
        assert!(matches!(
            Expr::resolve(&Condition::is("failure", "yes"), &vars, 0),
            Err(ConfigError::UnknownVariable { .. })
        ));
        assert_eq!(
            Expr::resolve(&Condition::any([]), &vars, 1),
            Err(ConfigError::EmptyCondition { rule: 1 })
        );
    }

    #[test]
    fn test_eval_or_takes_max_and_takes_min() {
        let (vars, speed, wear) = vars();
        let expr = Expr::resolve(
            &Condition::any([
                Condition::is("speed", "high"),
                Condition::all([Condition::is("speed", "low"), Condition::is("wear", "high")]),
            ]),
            &vars,
            0,
        )
        .unwrap();
        let degree = |key: VariableKey, term: TermId| match (key == speed, key == wear, term.index()) {
            (true, _, 0) => 0.9,
            (true, _, _) => 0.1,
            (_, true, _) => 0.4,
            _ => unreachable!(),
        };

        // max(0.1, min(0.9, 0.4))
        assert_eq!(expr.eval(&degree, AndOp::Min, OrOp::Max), 0.4);
        // 0.1 + 0.36 - 0.036
        let prob = expr.eval(&degree, AndOp::Prod, OrOp::ProbOr);
        assert!((prob - 0.424).abs() < 1e-12);
    }
}
