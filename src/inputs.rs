use std::collections::HashMap;

/// Crisp values for one evaluation, keyed by antecedent name.
///
/// An `Inputs` is the evaluation context of a single prediction: fill it,
/// hand it to [`InferenceSystem::compute`](crate::InferenceSystem::compute)
/// and drop it. Names the system does not use are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs(pub(crate) HashMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Inputs(HashMap::with_capacity(capacity))
    }

    /// Sets (or replaces) the value of a variable
    pub fn add(&mut self, variable: impl Into<String>, val: f64) -> &mut Self {
        self.0.insert(variable.into(), val);
        self
    }

    /// Builder style [`add`](Self::add)
    pub fn with(mut self, variable: impl Into<String>, val: f64) -> Self {
        self.add(variable, val);
        self
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Inputs {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Inputs(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[test]
fn test_inputs_replace_values() {
    let mut inputs = Inputs::new().with("torque", 39.);
    inputs.add("torque", 41.).add("tool_wear", 0.);

    assert_eq!(inputs.get("torque"), Some(41.));
    assert_eq!(inputs.get("tool_wear"), Some(0.));
    assert_eq!(inputs.get("rotational_speed"), None);
    assert_eq!(inputs.len(), 2);
}

#[test]
fn test_inputs_from_pairs() {
    let inputs: Inputs = [("torque", 39.), ("tool_wear", 3.)].into_iter().collect();

    assert_eq!(inputs.get("tool_wear"), Some(3.));
    assert!(!inputs.is_empty());
}
