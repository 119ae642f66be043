//! Declarative description of an inference system
//!
//! A [`SystemDefinition`] is plain data: variable names, universes,
//! triangle breakpoints and rules that refer to everything by name. It can
//! be written in code or loaded from TOML, and nothing in it is checked
//! until [`SystemDefinition::build`] resolves the names into an
//! [`InferenceSystem`].
//!
//! ```toml
//! [[antecedents]]
//! name = "tool_wear"
//! universe = { min = 0.0, max = 10.0, step = 1.0 }
//! terms = [
//!     { label = "low", trimf = [0.0, 0.0, 5.0] },
//!     { label = "high", trimf = [3.0, 8.0, 10.0] },
//! ]
//!
//! [consequent]
//! name = "machine_failure"
//! universe = { min = 0.0, max = 1.0, step = 1.0 }
//! terms = [
//!     { label = "no", trimf = [0.0, 0.0, 1.0] },
//!     { label = "yes", trimf = [0.0, 1.0, 1.0] },
//! ]
//!
//! [[rules]]
//! when = { any = [{ variable = "tool_wear", term = "high" }] }
//! then = { variable = "machine_failure", term = "yes" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::InferenceConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::inference::InferenceSystem;

/// Sampling of a variable's universe: `min..=max` every `step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniverseDefinition {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl UniverseDefinition {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }
}

/// A labelled triangular fuzzy set. Breakpoints are checked at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermDefinition {
    pub label: String,
    pub trimf: [f64; 3],
}

impl TermDefinition {
    pub fn new(label: impl Into<String>, trimf: [f64; 3]) -> Self {
        Self {
            label: label.into(),
            trimf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub universe: UniverseDefinition,
    pub terms: Vec<TermDefinition>,
}

impl VariableDefinition {
    pub fn new(name: impl Into<String>, universe: UniverseDefinition) -> Self {
        Self {
            name: name.into(),
            universe,
            terms: Vec::new(),
        }
    }

    /// Adds a triangular term, builder style
    pub fn term(mut self, label: impl Into<String>, trimf: [f64; 3]) -> Self {
        self.terms.push(TermDefinition::new(label, trimf));
        self
    }
}

/// `variable is term`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposition {
    pub variable: String,
    pub term: String,
}

impl Proposition {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }
}

/// Premise of a rule, referring to antecedents by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Is(Proposition),
    /// OR over the nested conditions
    Any { any: Vec<Condition> },
    /// AND over the nested conditions
    All { all: Vec<Condition> },
}

impl Condition {
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Condition::Is(Proposition::new(variable, term))
    }

    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Any {
            any: conditions.into_iter().collect(),
        }
    }

    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::All {
            all: conditions.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub when: Condition,
    pub then: Proposition,
}

impl RuleDefinition {
    pub fn new(when: Condition, then: Proposition) -> Self {
        Self { when, then }
    }
}

/// Everything needed to build an [`InferenceSystem`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDefinition {
    pub antecedents: Vec<VariableDefinition>,
    pub consequent: VariableDefinition,
    pub rules: Vec<RuleDefinition>,
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl SystemDefinition {
    pub fn new(consequent: VariableDefinition) -> Self {
        Self {
            antecedents: Vec::new(),
            consequent,
            rules: Vec::new(),
            inference: InferenceConfig::default(),
        }
    }

    pub fn antecedent(mut self, variable: VariableDefinition) -> Self {
        self.antecedents.push(variable);
        self
    }

    pub fn rule(mut self, when: Condition, then: Proposition) -> Self {
        self.rules.push(RuleDefinition::new(when, then));
        self
    }

    pub fn with_inference(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    /// Validates every name and breakpoint and builds the immutable system
    pub fn build(&self) -> ConfigResult<InferenceSystem> {
        InferenceSystem::build(self)
    }

    /// Load a definition from a TOML string
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a definition from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;

        Self::from_toml(&text)
    }

    /// Serialize the definition to a TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
