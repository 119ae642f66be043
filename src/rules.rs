use crate::definition::RuleDefinition;
use crate::dsl::Expr;
use crate::error::{ConfigError, ConfigResult};
use crate::terms::TermId;
use crate::variable::{VariableKey, Variables};

#[derive(Clone, Debug, Default)]
pub(crate) struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    /// Resolve every rule against `vars`; consequences must target `consequent`
    pub(crate) fn resolve(defs: &[RuleDefinition], vars: &Variables, consequent: VariableKey) -> ConfigResult<Self> {
        if defs.is_empty() {
            return Err(ConfigError::NoRules);
        }

        let mut rules = Vec::with_capacity(defs.len());

        for (i, def) in defs.iter().enumerate() {
            let premise = Expr::resolve(&def.when, vars, i)?;

            if vars.key(&def.then.variable) != Some(consequent) {
                return Err(ConfigError::NotConsequent {
                    rule: i,
                    variable: def.then.variable.clone(),
                });
            }

            let consequence = vars[consequent]
                .term_id(&def.then.term)
                .ok_or_else(|| ConfigError::UnknownTerm {
                    rule: i,
                    variable: def.then.variable.clone(),
                    term: def.then.term.clone(),
                })?;

            rules.push(Rule { premise, consequence });
        }

        Ok(Rules(rules))
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Rule {
    pub(crate) premise: Expr,
    /// Term of the consequent this rule concludes on
    pub(crate) consequence: TermId,
}
