//! Error types for building and evaluating inference systems

use thiserror::Error;

/// Errors raised while building an [`InferenceSystem`](crate::InferenceSystem)
/// from a [`SystemDefinition`](crate::SystemDefinition). These are fatal:
/// construction aborts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Universe bounds or step are unusable
    #[error("Invalid universe for `{variable}`: {reason}")]
    InvalidUniverse { variable: String, reason: String },

    /// Variable declares no terms
    #[error("Variable `{variable}` has no terms")]
    NoTerms { variable: String },

    /// Two variables share a name
    #[error("Variable `{name}` is defined more than once")]
    DuplicateVariable { name: String },

    /// Two terms of one variable share a label
    #[error("Term `{term}` is defined more than once on `{variable}`")]
    DuplicateTerm { variable: String, term: String },

    /// Triangle breakpoints are not finite or not ordered a <= b <= c
    #[error("Term `{term}` on `{variable}` has invalid breakpoints {points:?} (need a <= b <= c)")]
    InvalidBreakpoints { variable: String, term: String, points: [f64; 3] },

    /// Triangle support leaves the universe
    #[error("Term `{term}` on `{variable}` lies outside the universe [{min}, {max}]")]
    SupportOutOfBounds {
        variable: String,
        term: String,
        min: f64,
        max: f64,
    },

    /// Rule references a variable that is not an antecedent
    #[error("Rule {rule} references unknown antecedent `{variable}`")]
    UnknownVariable { rule: usize, variable: String },

    /// Rule references a term the variable does not define
    #[error("Rule {rule} references unknown term `{term}` on `{variable}`")]
    UnknownTerm { rule: usize, variable: String, term: String },

    /// Rule consequence targets something other than the consequent
    #[error("Rule {rule} concludes on `{variable}`, which is not the consequent")]
    NotConsequent { rule: usize, variable: String },

    /// `any` or `all` clause without propositions
    #[error("Rule {rule} has an empty clause")]
    EmptyCondition { rule: usize },

    /// Definition declares no rules
    #[error("Inference system has no rules")]
    NoRules,

    /// Definition text could not be parsed
    #[error("Failed to parse definition: {0}")]
    Parse(String),

    /// Definition file could not be read
    #[error("Failed to read definition: {0}")]
    Io(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

/// Errors raised by a single evaluation. These are recoverable; the
/// inference system is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// An antecedent used by some rule has no value
    #[error("Missing input for `{variable}`")]
    MissingInput { variable: String },

    /// The aggregated output is zero everywhere, so no crisp value exists
    #[error("Cannot defuzzify `{variable}`: no rule fired")]
    Defuzzification { variable: String },
}

/// Result alias for build-time operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result alias for evaluations
pub type InferenceResult<T> = Result<T, InferenceError>;
