use crate::variable::{Curve, MembershipPlot};

/// Everything one evaluation produced, not just the crisp value
#[derive(Clone, Debug, PartialEq)]
pub struct Outputs {
    variable: String,
    crisp: f64,
    firing_strengths: Vec<f64>,
    activations: Vec<(String, f64)>,
    universe: Vec<f64>,
    aggregated: Vec<f64>,
}

impl Outputs {
    pub(crate) fn new(
        variable: String,
        crisp: f64,
        firing_strengths: Vec<f64>,
        activations: Vec<(String, f64)>,
        universe: Vec<f64>,
        aggregated: Vec<f64>,
    ) -> Self {
        Self {
            variable,
            crisp,
            firing_strengths,
            activations,
            universe,
            aggregated,
        }
    }

    /// Name of the consequent
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Defuzzified output
    pub fn crisp(&self) -> f64 {
        self.crisp
    }

    /// Firing strength of each rule, in rule order
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }

    /// Aggregated activation of a consequent term
    pub fn activation(&self, term: &str) -> Option<f64> {
        self.activations.iter().find(|(label, _)| label == term).map(|(_, a)| *a)
    }

    pub fn activations(&self) -> &[(String, f64)] {
        &self.activations
    }

    /// Aggregated output membership over the consequent universe
    pub fn aggregated(&self) -> &[f64] {
        &self.aggregated
    }

    /// Plot-ready aggregated output curve
    pub fn view(&self) -> MembershipPlot {
        MembershipPlot {
            variable: self.variable.clone(),
            universe: self.universe.clone(),
            curves: vec![Curve {
                label: "aggregated".to_owned(),
                degrees: self.aggregated.clone(),
            }],
        }
    }
}
