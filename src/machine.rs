//! The machine-failure classifier: built-in variables and rules, sensor
//! readings and the verdict derived from the crisp output.

use fixed_map::{Key, Map};
use tracing::debug;

use crate::definition::{Condition, Proposition, SystemDefinition, UniverseDefinition, VariableDefinition};
use crate::error::{InferenceError, InferenceResult};
use crate::inference::InferenceSystem;
use crate::inputs::Inputs;

pub const MACHINE_FAILURE: &str = "machine_failure";

/// Air temperature used when the operator does not supply one (K)
pub const SAMPLE_AIR_TEMPERATURE: f64 = 298.2;
/// Process temperature used when the operator does not supply one (K)
pub const SAMPLE_PROCESS_TEMPERATURE: f64 = 308.7;
/// Converts rpm to rad/s
pub const RPM_TO_RAD_PER_SEC: f64 = 0.104719755;
/// Score above which failure is predicted
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// The five inputs of the classifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Key)]
pub enum Sensor {
    AirTemperature,
    ProcessTemperature,
    RotationalSpeed,
    Torque,
    ToolWear,
}

impl Sensor {
    pub const ALL: [Sensor; 5] = [
        Sensor::AirTemperature,
        Sensor::ProcessTemperature,
        Sensor::RotationalSpeed,
        Sensor::Torque,
        Sensor::ToolWear,
    ];

    /// Antecedent name in the inference system
    pub fn name(self) -> &'static str {
        match self {
            Sensor::AirTemperature => "air_temperature",
            Sensor::ProcessTemperature => "process_temperature",
            Sensor::RotationalSpeed => "rotational_speed",
            Sensor::Torque => "torque",
            Sensor::ToolWear => "tool_wear",
        }
    }

    fn variable(self) -> VariableDefinition {
        match self {
            Sensor::AirTemperature => VariableDefinition::new(self.name(), UniverseDefinition::new(298., 299., 0.1))
                .term("low", [298., 298., 298.5])
                .term("high", [298.4, 298.9, 299.]),
            Sensor::ProcessTemperature => VariableDefinition::new(self.name(), UniverseDefinition::new(308., 309., 0.1))
                .term("low", [308., 308., 308.5])
                .term("high", [308.4, 308.9, 309.]),
            Sensor::RotationalSpeed => VariableDefinition::new(self.name(), UniverseDefinition::new(1400., 1600., 1.))
                .term("low", [1400., 1400., 1500.])
                .term("high", [1450., 1550., 1600.]),
            Sensor::Torque => VariableDefinition::new(self.name(), UniverseDefinition::new(39., 50., 0.1))
                .term("low", [39., 39., 44.])
                .term("high", [42., 47., 50.]),
            Sensor::ToolWear => VariableDefinition::new(self.name(), UniverseDefinition::new(0., 10., 1.))
                .term("low", [0., 0., 5.])
                .term("high", [3., 8., 10.]),
        }
    }

    /// Term that points towards failure. Low readings do, except for tool wear.
    fn failure_term(self) -> &'static str {
        match self {
            Sensor::ToolWear => "high",
            _ => "low",
        }
    }

    fn healthy_term(self) -> &'static str {
        match self {
            Sensor::ToolWear => "low",
            _ => "high",
        }
    }
}

/// The built-in two-rule machine-failure system.
///
/// 1. any failure-leaning reading (low temperatures, speed or torque, high
///    tool wear) concludes `machine_failure is yes`;
/// 2. any healthy reading concludes `machine_failure is no`.
pub fn definition() -> SystemDefinition {
    let consequent = VariableDefinition::new(MACHINE_FAILURE, UniverseDefinition::new(0., 1., 1.))
        .term("no", [0., 0., 1.])
        .term("yes", [0., 1., 1.]);

    Sensor::ALL
        .into_iter()
        .fold(SystemDefinition::new(consequent), |def, sensor| def.antecedent(sensor.variable()))
        .rule(
            Condition::any(Sensor::ALL.map(|s| Condition::is(s.name(), s.failure_term()))),
            Proposition::new(MACHINE_FAILURE, "yes"),
        )
        .rule(
            Condition::any(Sensor::ALL.map(|s| Condition::is(s.name(), s.healthy_term()))),
            Proposition::new(MACHINE_FAILURE, "no"),
        )
}

/// One set of readings, keyed by sensor
#[derive(Clone)]
pub struct SensorReadings(Map<Sensor, f64>);

impl Default for SensorReadings {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorReadings {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Readings as an operator enters them: speed, torque, tool wear and the
    /// process/air temperature difference. Process temperature is derived as
    /// `air_temperature + temp_difference`.
    pub fn from_operator(
        rotational_speed: f64,
        torque: f64,
        tool_wear: f64,
        air_temperature: f64,
        temp_difference: f64,
    ) -> Self {
        Self::new()
            .with(Sensor::RotationalSpeed, rotational_speed)
            .with(Sensor::Torque, torque)
            .with(Sensor::ToolWear, tool_wear)
            .with_temperature_difference(air_temperature, temp_difference)
    }

    pub fn set(&mut self, sensor: Sensor, value: f64) -> &mut Self {
        self.0.insert(sensor, value);
        self
    }

    pub fn with(mut self, sensor: Sensor, value: f64) -> Self {
        self.set(sensor, value);
        self
    }

    /// Sets air temperature and derives process temperature from the difference
    pub fn with_temperature_difference(self, air_temperature: f64, temp_difference: f64) -> Self {
        self.with(Sensor::AirTemperature, air_temperature)
            .with(Sensor::ProcessTemperature, air_temperature + temp_difference)
    }

    pub fn get(&self, sensor: Sensor) -> Option<f64> {
        self.0.get(sensor).copied()
    }

    /// Evaluation context holding every reading that is present
    pub fn to_inputs(&self) -> Inputs {
        Sensor::ALL
            .into_iter()
            .filter_map(|sensor| self.get(sensor).map(|v| (sensor.name(), v)))
            .collect()
    }
}

impl std::fmt::Debug for SensorReadings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(Sensor::ALL.into_iter().filter_map(|s| self.get(s).map(|v| (s, v))))
            .finish()
    }
}

/// Engineering quantities shown next to the prediction. They are not
/// inputs of the inference system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedFeatures {
    /// torque x angular velocity (W)
    pub power: f64,
    /// torque x tool wear
    pub strain: f64,
}

impl DerivedFeatures {
    pub fn new(rotational_speed: f64, torque: f64, tool_wear: f64) -> Self {
        Self {
            power: torque * rotational_speed * RPM_TO_RAD_PER_SEC,
            strain: torque * tool_wear,
        }
    }

    /// `None` unless speed, torque and tool wear are all present
    pub fn from_readings(readings: &SensorReadings) -> Option<Self> {
        Some(Self::new(
            readings.get(Sensor::RotationalSpeed)?,
            readings.get(Sensor::Torque)?,
            readings.get(Sensor::ToolWear)?,
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    No,
    Yes,
    /// No rule fired, so there is no score to judge
    Undetermined,
}

impl Verdict {
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score > threshold {
            Verdict::Yes
        } else {
            Verdict::No
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Verdict::No => "no",
            Verdict::Yes => "yes",
            Verdict::Undetermined => "undetermined",
        };

        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    /// Crisp `machine_failure`, absent when no rule fired
    pub score: Option<f64>,
    pub verdict: Verdict,
    pub derived: Option<DerivedFeatures>,
}

/// Turns sensor readings into a failure verdict
#[derive(Clone, Debug)]
pub struct FailurePredictor {
    system: InferenceSystem,
    threshold: f64,
}

impl FailurePredictor {
    pub fn new(system: InferenceSystem) -> Self {
        Self {
            system,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn system(&self) -> &InferenceSystem {
        &self.system
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// A missing reading is an error; a reading set that fires no rule is
    /// [`Verdict::Undetermined`].
    pub fn predict(&self, readings: &SensorReadings) -> InferenceResult<Prediction> {
        let derived = DerivedFeatures::from_readings(readings);

        let (score, verdict) = match self.system.compute(&readings.to_inputs()) {
            Ok(score) => (Some(score), Verdict::from_score(score, self.threshold)),
            Err(InferenceError::Defuzzification { .. }) => (None, Verdict::Undetermined),
            Err(e) => return Err(e),
        };

        debug!(?readings, ?score, %verdict, "Predicted machine failure");

        Ok(Prediction {
            score,
            verdict,
            derived,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_builds() {
        let system = definition().build().unwrap();

        assert_eq!(system.antecedents().count(), 5);
        assert_eq!(system.rule_count(), 2);
        assert_eq!(system.consequent().name(), MACHINE_FAILURE);
        assert_eq!(system.required_inputs().collect::<Vec<_>>(), Sensor::ALL.map(Sensor::name).to_vec());
    }

    #[test]
    fn test_universes_cover_the_terms() {
        let system = definition().build().unwrap();
        let lens: Vec<usize> = system.variables().map(|v| v.universe().len()).collect();

        assert_eq!(lens, vec![11, 11, 201, 111, 11, 2]);
    }

    #[test]
    fn test_rules_pair_failure_and_healthy_terms() {
        let def = definition();

        assert_eq!(
            def.rules[0].when,
            Condition::any([
                Condition::is("air_temperature", "low"),
                Condition::is("process_temperature", "low"),
                Condition::is("rotational_speed", "low"),
                Condition::is("torque", "low"),
                Condition::is("tool_wear", "high"),
            ])
        );
        assert_eq!(def.rules[1].then, Proposition::new(MACHINE_FAILURE, "no"));
    }

    #[test]
    fn test_readings_from_operator() {
        let readings = SensorReadings::from_operator(1400., 39., 0., SAMPLE_AIR_TEMPERATURE, 10.5);

        assert_eq!(readings.get(Sensor::AirTemperature), Some(298.2));
        let process = readings.get(Sensor::ProcessTemperature).unwrap();
        assert!((process - SAMPLE_PROCESS_TEMPERATURE).abs() < 1e-9);

        let inputs = readings.to_inputs();
        assert_eq!(inputs.len(), 5);
        assert_eq!(inputs.get("rotational_speed"), Some(1400.));
    }

    #[test]
    fn test_derived_features() {
        let derived = DerivedFeatures::new(1400., 39., 2.);

        assert!((derived.power - 39. * 1400. * 0.104719755).abs() < 1e-9);
        assert_eq!(derived.strain, 78.);

        let partial = SensorReadings::new().with(Sensor::Torque, 39.);
        assert_eq!(DerivedFeatures::from_readings(&partial), None);
    }

    #[test]
    fn test_verdict_threshold() {
        assert_eq!(Verdict::from_score(0.9, 0.5), Verdict::Yes);
        assert_eq!(Verdict::from_score(0.5, 0.5), Verdict::No);
        assert_eq!(Verdict::from_score(0.2, 0.5), Verdict::No);
        assert_eq!(Verdict::Undetermined.to_string(), "undetermined");
    }

    #[test]
    fn test_predict_missing_reading() {
        let predictor = FailurePredictor::new(definition().build().unwrap());
        let readings = SensorReadings::new()
            .with(Sensor::RotationalSpeed, 1400.)
            .with(Sensor::ToolWear, 0.)
            .with_temperature_difference(298.2, 10.5);

        assert_eq!(
            predictor.predict(&readings),
            Err(InferenceError::MissingInput {
                variable: "torque".into()
            })
        );
    }
}
