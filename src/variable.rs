use std::collections::HashMap;
use std::ops::Index;

use serde::Serialize;
use slotmap::{new_key_type, SlotMap};

use crate::definition::VariableDefinition;
use crate::error::{ConfigError, ConfigResult};
use crate::linspace::Linspace;
use crate::terms::{Term, TermId, Triangle};

// Guards against a tiny step blowing up the universe allocation
const MAX_UNIVERSE_SAMPLES: f64 = 1_000_000.;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Whether a variable feeds rules or is concluded by them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Antecedent,
    Consequent,
}

/// A named variable sampled over a discrete universe, with its fuzzy terms
#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    min_u: f64,
    max_u: f64,
    universe: Vec<f64>,
    terms: Vec<Term>,
}

impl LinguisticVariable {
    pub(crate) fn from_definition(def: &VariableDefinition, role: Role) -> ConfigResult<Self> {
        let invalid = |reason: &str| ConfigError::InvalidUniverse {
            variable: def.name.clone(),
            reason: reason.to_owned(),
        };
        let u = def.universe;

        if !(u.min.is_finite() && u.max.is_finite() && u.step.is_finite()) {
            return Err(invalid("bounds and step must be finite"));
        }
        if u.min > u.max {
            return Err(invalid("min must not exceed max"));
        }
        if u.step <= 0. {
            return Err(invalid("step must be positive"));
        }
        if (u.max - u.min) / u.step >= MAX_UNIVERSE_SAMPLES {
            return Err(invalid("step is too small for the range"));
        }
        if def.terms.is_empty() {
            return Err(ConfigError::NoTerms {
                variable: def.name.clone(),
            });
        }

        let universe: Vec<f64> = Linspace::with_step(u.min, u.max, u.step).collect();
        let mut terms: Vec<Term> = Vec::with_capacity(def.terms.len());

        for term in &def.terms {
            if terms.iter().any(|t| t.label() == term.label) {
                return Err(ConfigError::DuplicateTerm {
                    variable: def.name.clone(),
                    term: term.label.clone(),
                });
            }

            let [a, b, c] = term.trimf;
            let function = Triangle::new(a, b, c).ok_or_else(|| ConfigError::InvalidBreakpoints {
                variable: def.name.clone(),
                term: term.label.clone(),
                points: term.trimf,
            })?;

            if !function.within(u.min, u.max) {
                return Err(ConfigError::SupportOutOfBounds {
                    variable: def.name.clone(),
                    term: term.label.clone(),
                    min: u.min,
                    max: u.max,
                });
            }

            terms.push(Term::new(term.label.clone(), function, &universe));
        }

        Ok(Self {
            name: def.name.clone(),
            role,
            min_u: u.min,
            max_u: u.max,
            universe,
            terms,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &[f64] {
        &self.universe
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min_u, self.max_u)
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term_id(&self, label: &str) -> Option<TermId> {
        self.terms.iter().position(|t| t.label() == label).map(TermId)
    }

    pub fn term(&self, label: &str) -> Option<&Term> {
        self.term_id(label).map(|id| &self.terms[id.0])
    }

    /// Clamp a crisp value into the universe bounds
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.min_u, self.max_u)
    }

    /// Degree of `value` in every term, in term order
    pub fn fuzzify(&self, value: f64) -> Vec<f64> {
        self.terms.iter().map(|t| t.function().degree(value)).collect()
    }

    /// Plot-ready projection: the universe and each term's degree curve
    pub fn view(&self) -> MembershipPlot {
        MembershipPlot {
            variable: self.name.clone(),
            universe: self.universe.clone(),
            curves: self
                .terms
                .iter()
                .map(|t| Curve {
                    label: t.label().to_owned(),
                    degrees: t.samples().to_vec(),
                })
                .collect(),
        }
    }
}

impl Index<TermId> for LinguisticVariable {
    type Output = Term;

    fn index(&self, id: TermId) -> &Term {
        &self.terms[id.0]
    }
}

/// Membership curves of one variable, ready for an external renderer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MembershipPlot {
    pub variable: String,
    pub universe: Vec<f64>,
    pub curves: Vec<Curve>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Curve {
    pub label: String,
    pub degrees: Vec<f64>,
}

/// Name-indexed store of every variable of a system
#[derive(Clone, Debug, Default)]
pub(crate) struct Variables {
    slots: SlotMap<VariableKey, LinguisticVariable>,
    by_name: HashMap<String, VariableKey>,
}

impl Variables {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            by_name: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, variable: LinguisticVariable) -> ConfigResult<VariableKey> {
        if self.by_name.contains_key(variable.name()) {
            return Err(ConfigError::DuplicateVariable {
                name: variable.name().to_owned(),
            });
        }

        let name = variable.name().to_owned();
        let key = self.slots.insert(variable);
        self.by_name.insert(name, key);

        Ok(key)
    }

    pub(crate) fn key(&self, name: &str) -> Option<VariableKey> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&LinguisticVariable> {
        self.key(name).map(|key| &self.slots[key])
    }
}

impl Index<VariableKey> for Variables {
    type Output = LinguisticVariable;

    fn index(&self, key: VariableKey) -> &LinguisticVariable {
        &self.slots[key]
    }
}
