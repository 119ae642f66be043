//! Mamdani fuzzy inference, and the machine-failure classifier built on it.
//!
//! A [`SystemDefinition`] names the variables, their triangular terms and
//! the rules. [`InferenceSystem::build`] validates it once; after that the
//! system is immutable and every [`InferenceSystem::compute`] call fuzzifies
//! one set of [`Inputs`], fires the rules, aggregates the consequent terms
//! and defuzzifies the result.
//!
//! ```
//! use fuzzy_failure::machine::{self, FailurePredictor, SensorReadings, Verdict};
//!
//! let predictor = FailurePredictor::new(machine::definition().build()?);
//! let readings = SensorReadings::from_operator(1400., 39., 8., 298., 10.);
//! let prediction = predictor.predict(&readings)?;
//!
//! assert_eq!(prediction.verdict, Verdict::Yes);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod definition;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod ops;
mod outputs;
mod rules;
mod terms;
mod variable;

pub mod machine;

pub use config::InferenceConfig;
pub use definition::{
    Condition, Proposition, RuleDefinition, SystemDefinition, TermDefinition, UniverseDefinition, VariableDefinition,
};
pub use error::{ConfigError, ConfigResult, InferenceError, InferenceResult};
pub use inference::InferenceSystem;
pub use inputs::Inputs;
pub use ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp, ProductionLink};
pub use outputs::Outputs;
pub use terms::{Term, TermId, Triangle};
pub use variable::{Curve, LinguisticVariable, MembershipPlot, Role, VariableKey};
