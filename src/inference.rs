use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::InferenceConfig;
use crate::definition::SystemDefinition;
use crate::error::{ConfigResult, InferenceError, InferenceResult};
use crate::inputs::Inputs;
use crate::outputs::Outputs;
use crate::rules::Rules;
use crate::terms::TermId;
use crate::variable::{LinguisticVariable, Role, VariableKey, Variables};

/// A validated, immutable Mamdani inference system.
///
/// Built once from a [`SystemDefinition`]; every evaluation only reads it,
/// so a single system can be shared by reference (it is `Send + Sync`).
///
/// # Examples
///
/// ```
/// use fuzzy_failure::{machine, Inputs};
///
/// let system = machine::definition().build().unwrap();
/// let inputs = Inputs::new()
///     .with("air_temperature", 298.0)
///     .with("process_temperature", 308.0)
///     .with("rotational_speed", 1400.0)
///     .with("torque", 39.0)
///     .with("tool_wear", 8.0);
///
/// assert_eq!(system.compute(&inputs).unwrap(), 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct InferenceSystem {
    vars: Variables,
    antecedents: Vec<VariableKey>,
    consequent: VariableKey,
    /// Antecedents some rule reads, in definition order
    required: Vec<VariableKey>,
    rules: Rules,
    config: InferenceConfig,
}

impl InferenceSystem {
    /// Validate a definition and resolve every name in it
    pub fn build(def: &SystemDefinition) -> ConfigResult<Self> {
        let mut vars = Variables::with_capacity(def.antecedents.len() + 1);
        let mut antecedents = Vec::with_capacity(def.antecedents.len());

        for var_def in &def.antecedents {
            let var = LinguisticVariable::from_definition(var_def, Role::Antecedent)?;
            antecedents.push(vars.insert(var)?);
        }

        let consequent = vars.insert(LinguisticVariable::from_definition(&def.consequent, Role::Consequent)?)?;
        let rules = Rules::resolve(&def.rules, &vars, consequent)?;

        let mut required: Vec<VariableKey> = Vec::with_capacity(antecedents.len());

        for rule in rules.iter() {
            for (var_key, _) in rule.premise.propositions() {
                if !required.contains(&var_key) {
                    required.push(var_key);
                }
            }
        }
        required.sort_by_key(|key| antecedents.iter().position(|a| a == key));

        info!(
            antecedents = antecedents.len(),
            rules = rules.len(),
            consequent = %def.consequent.name,
            "Built inference system"
        );

        Ok(Self {
            vars,
            antecedents,
            consequent,
            required,
            rules,
            config: def.inference,
        })
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Antecedents in definition order
    pub fn antecedents(&self) -> impl Iterator<Item = &LinguisticVariable> + '_ {
        self.antecedents.iter().map(|key| &self.vars[*key])
    }

    pub fn consequent(&self) -> &LinguisticVariable {
        &self.vars[self.consequent]
    }

    /// Look up any variable, antecedent or consequent, by name
    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.vars.get(name)
    }

    /// Every variable, antecedents first
    pub fn variables(&self) -> impl Iterator<Item = &LinguisticVariable> + '_ {
        self.antecedents().chain(Some(self.consequent()))
    }

    /// Names of the antecedents that must be present in every [`Inputs`]
    pub fn required_inputs(&self) -> impl Iterator<Item = &str> + '_ {
        self.required.iter().map(|key| self.vars[*key].name())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Crisp output for `inputs`
    pub fn compute(&self, inputs: &Inputs) -> InferenceResult<f64> {
        self.evaluate(inputs).map(|outputs| outputs.crisp())
    }

    /// Crisp output for `inputs`, along with rule strengths and the
    /// aggregated output curve
    pub fn evaluate(&self, inputs: &Inputs) -> InferenceResult<Outputs> {
        let cfg = &self.config;

        // Check Facts
        for key in &self.required {
            let name = self.vars[*key].name();

            if inputs.get(name).is_none() {
                return Err(InferenceError::MissingInput {
                    variable: name.to_owned(),
                });
            }
        }

        // Fuzzificate Facts
        // Degree of every present antecedent in each of its terms
        let mut fact_values: HashMap<VariableKey, Vec<f64>> = HashMap::with_capacity(self.antecedents.len());

        for key in &self.antecedents {
            let var = &self.vars[*key];
            let Some(value) = inputs.get(var.name()) else {
                continue;
            };
            let value = if cfg.clip_to_universe { var.clip(value) } else { value };
            let degrees = var.fuzzify(value);

            debug!(variable = var.name(), value, ?degrees, "Fuzzified input");
            fact_values.insert(*key, degrees);
        }

        // Compute Rule Firing Strengths
        // Every proposition's variable is in `required`, so the lookup cannot miss
        let degree = |key: VariableKey, term: TermId| fact_values.get(&key).map_or(0., |d| d[term.index()]);
        let firing_strengths: Vec<f64> = self
            .rules
            .iter()
            .map(|rule| rule.premise.eval(&degree, cfg.and_op, cfg.or_op))
            .collect();

        debug!(?firing_strengths, "Evaluated rules");

        // Aggregate Rule Activations per consequent term
        let consequent = &self.vars[self.consequent];
        let mut activations = vec![0.; consequent.terms().len()];

        for (rule, strength) in self.rules.iter().zip(&firing_strengths) {
            let slot = &mut activations[rule.consequence.index()];
            *slot = cfg.aggregation.apply(*slot, *strength);
        }

        // Compute Fuzzy Implication and Aggregate Collected Memberships
        let mut aggregated = vec![0.; consequent.universe().len()];

        for (term, activation) in consequent.terms().iter().zip(&activations) {
            let implied = cfg.implication.call(*activation, term.samples().iter().copied());

            aggregated = cfg.aggregation.call(aggregated, implied).collect();
        }

        // Defuzzificate
        let Some(crisp) = cfg.defuzzification.call(consequent.universe(), &aggregated) else {
            warn!(variable = consequent.name(), "No rule fired, output cannot be defuzzified");

            return Err(InferenceError::Defuzzification {
                variable: consequent.name().to_owned(),
            });
        };

        debug!(variable = consequent.name(), crisp, "Defuzzified output");

        let activations = consequent
            .terms()
            .iter()
            .map(|t| t.label().to_owned())
            .zip(activations)
            .collect();

        Ok(Outputs::new(
            consequent.name().to_owned(),
            crisp,
            firing_strengths,
            activations,
            consequent.universe().to_vec(),
            aggregated,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Condition, Proposition, UniverseDefinition, VariableDefinition};
    use crate::error::ConfigError;
    use crate::ops::{DefuzzificationOp, ImplicationOp};

    fn failure() -> VariableDefinition {
        VariableDefinition::new("failure", UniverseDefinition::new(0., 1., 1.))
            .term("no", [0., 0., 1.])
            .term("yes", [0., 1., 1.])
    }

    fn wear() -> VariableDefinition {
        VariableDefinition::new("wear", UniverseDefinition::new(0., 10., 1.))
            .term("low", [0., 0., 5.])
            .term("high", [3., 8., 10.])
    }

    fn speed() -> VariableDefinition {
        VariableDefinition::new("speed", UniverseDefinition::new(0., 100., 1.))
            .term("low", [0., 0., 50.])
            .term("high", [50., 100., 100.])
    }

    fn two_rules() -> SystemDefinition {
        SystemDefinition::new(failure())
            .antecedent(wear())
            .antecedent(speed())
            .rule(
                Condition::any([Condition::is("wear", "high"), Condition::is("speed", "low")]),
                Proposition::new("failure", "yes"),
            )
            .rule(Condition::is("wear", "low"), Proposition::new("failure", "no"))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_evaluate_reports_every_stage() {
        let system = two_rules().build().unwrap();
        let inputs = Inputs::new().with("wear", 4.).with("speed", 75.);

        let outputs = system.evaluate(&inputs).unwrap();

        // wear 4 is high 0.2 and low 0.2, speed 75 is not low
        assert_eq!(outputs.firing_strengths(), &[0.2, 0.2]);
        assert_eq!(outputs.activation("yes"), Some(0.2));
        assert_eq!(outputs.activation("no"), Some(0.2));
        assert_eq!(outputs.aggregated(), &[0.2, 0.2]);
        assert!(close(outputs.crisp(), 0.5));
        assert_eq!(outputs.variable(), "failure");
    }

    #[test]
    fn test_rules_on_the_same_term_merge_by_max() {
        let def = two_rules().rule(Condition::is("speed", "high"), Proposition::new("failure", "no"));
        let system = def.build().unwrap();
        let inputs = Inputs::new().with("wear", 4.).with("speed", 75.);

        let outputs = system.evaluate(&inputs).unwrap();

        assert_eq!(outputs.firing_strengths(), &[0.2, 0.2, 0.5]);
        assert_eq!(outputs.activation("no"), Some(0.5));
        // (0 * 0.5 + 1 * 0.2) / 0.7
        assert!(close(outputs.crisp(), 0.2 / 0.7));
    }

    #[test]
    fn test_missing_required_input() {
        let system = two_rules().build().unwrap();
        let inputs = Inputs::new().with("wear", 4.);

        assert_eq!(
            system.compute(&inputs),
            Err(InferenceError::MissingInput {
                variable: "speed".into()
            })
        );
    }

    #[test]
    fn test_unreferenced_antecedents_are_optional() {
        let extra = VariableDefinition::new("humidity", UniverseDefinition::new(0., 1., 0.5)).term("dry", [0., 0., 1.]);
        let system = two_rules().antecedent(extra).build().unwrap();
        let inputs = Inputs::new().with("wear", 8.).with("speed", 75.).with("unknown", 3.);

        assert_eq!(system.required_inputs().collect::<Vec<_>>(), vec!["wear", "speed"]);
        assert_eq!(system.compute(&inputs), Ok(1.));
    }

    #[test]
    fn test_no_rule_fired() {
        let system = two_rules().build().unwrap();
        let inputs = Inputs::new().with("wear", 10.).with("speed", 100.);

        assert_eq!(
            system.compute(&inputs),
            Err(InferenceError::Defuzzification {
                variable: "failure".into()
            })
        );
    }

    #[test]
    fn test_clip_to_universe() {
        let mut def = two_rules();
        let inputs = Inputs::new().with("wear", -3.).with("speed", 500.);

        // Out of range: wear is neither low nor high, speed is not low
        assert!(def.build().unwrap().compute(&inputs).is_err());

        def.inference = def.inference.with_clip_to_universe(true);
        // Clipped to wear 0 (low) and speed 100 (not low)
        assert_eq!(def.build().unwrap().compute(&inputs), Ok(0.));
    }

    #[test]
    fn test_alternative_operators() {
        let mut def = two_rules();
        def.inference.implication = ImplicationOp::Prod;
        def.inference.defuzzification = DefuzzificationOp::Cog;
        let system = def.build().unwrap();
        let inputs = Inputs::new().with("wear", 4.).with("speed", 75.);

        // Scaled terms [0.2, 0] and [0, 0.2] merge to a flat line
        let outputs = system.evaluate(&inputs).unwrap();
        assert_eq!(outputs.aggregated(), &[0.2, 0.2]);
        assert!(close(outputs.crisp(), 0.5));
    }

    #[test]
    fn test_build_rejects_bad_rules() {
        let def = two_rules().rule(Condition::is("wear", "medium"), Proposition::new("failure", "no"));
        assert!(matches!(def.build(), Err(ConfigError::UnknownTerm { rule: 2, .. })));

        let def = two_rules().rule(Condition::is("wear", "low"), Proposition::new("failure", "maybe"));
        assert!(matches!(def.build(), Err(ConfigError::UnknownTerm { rule: 2, .. })));

        let def = two_rules().rule(Condition::is("wear", "low"), Proposition::new("speed", "high"));
        assert!(matches!(def.build(), Err(ConfigError::NotConsequent { rule: 2, .. })));

        let def = two_rules().rule(Condition::is("torque", "low"), Proposition::new("failure", "no"));
        assert!(matches!(def.build(), Err(ConfigError::UnknownVariable { rule: 2, .. })));

        let def = SystemDefinition::new(failure()).antecedent(wear());
        assert_eq!(def.build().unwrap_err(), ConfigError::NoRules);

        let def = two_rules().antecedent(wear());
        assert!(matches!(def.build(), Err(ConfigError::DuplicateVariable { .. })));
    }

    #[test]
    fn test_system_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<InferenceSystem>();
    }
}
