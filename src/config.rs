//! Operator configuration for inference

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp, ProductionLink};

/// Which fuzzy operators an [`InferenceSystem`](crate::InferenceSystem) uses.
///
/// The defaults give classic max/min Mamdani inference with a
/// sample-weighted centroid.
///
/// # Examples
///
/// ```
/// use fuzzy_failure::{DefuzzificationOp, InferenceConfig};
///
/// let config = InferenceConfig::from_toml("defuzzification = \"cog\"").unwrap();
/// assert_eq!(config.defuzzification, DefuzzificationOp::Cog);
/// assert!(!config.clip_to_universe);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Combines the propositions of an `all` clause
    pub and_op: AndOp,

    /// Combines the propositions of an `any` clause
    pub or_op: OrOp,

    /// Shapes each consequent term by its activation
    pub implication: ImplicationOp,

    /// Merges rules concluding on the same term, and the shaped terms into
    /// one output curve
    pub aggregation: ProductionLink,

    pub defuzzification: DefuzzificationOp,

    /// Clamp crisp inputs into their universe before fuzzification. When
    /// off, out-of-universe inputs just have degree 0.
    pub clip_to_universe: bool,
}

impl InferenceConfig {
    pub fn with_defuzzification(mut self, defuzzification: DefuzzificationOp) -> Self {
        self.defuzzification = defuzzification;
        self
    }

    pub fn with_clip_to_universe(mut self, clip: bool) -> Self {
        self.clip_to_universe = clip;
        self
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
