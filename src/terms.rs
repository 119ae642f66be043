//! Fuzzy sets: triangular membership functions and the labelled terms
//! built from them.

use serde::{Deserialize, Serialize};

/// Triangular membership function with breakpoints `a <= b <= c`.
///
/// The degree is 0 outside `[a, c]`, rises linearly from `a` to `b`, peaks
/// at 1 on `b` and falls linearly back to 0 at `c`. When `a == b` the rising
/// edge collapses into a step at `a` (and likewise for `b == c`), so the
/// degree at the shared point is 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct Triangle {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangle {
    /// Returns `None` unless all breakpoints are finite and ordered.
    pub fn new(a: f64, b: f64, c: f64) -> Option<Self> {
        let finite = a.is_finite() && b.is_finite() && c.is_finite();

        if finite && a <= b && b <= c {
            Some(Self { a, b, c })
        } else {
            None
        }
    }

    pub fn points(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }

    /// Membership degree of `x`, always within `[0, 1]`. NaN has degree 0.
    pub fn degree(&self, x: f64) -> f64 {
        if x == self.b {
            return 1.;
        }
        // Also rejects NaN
        if !(self.a <= x && x <= self.c) {
            return 0.;
        }

        // x < b implies a < b, and x > b implies b < c, so neither divides by zero
        let y = if x < self.b {
            (x - self.a) / (self.b - self.a)
        } else {
            (self.c - x) / (self.c - self.b)
        };

        y.clamp(0., 1.)
    }

    /// Degrees over every point of a universe
    pub fn sample(&self, universe: &[f64]) -> Vec<f64> {
        universe.iter().map(|&x| self.degree(x)).collect()
    }

    pub(crate) fn within(&self, min: f64, max: f64) -> bool {
        min <= self.a && self.c <= max
    }
}

impl TryFrom<[f64; 3]> for Triangle {
    type Error = String;

    fn try_from([a, b, c]: [f64; 3]) -> Result<Self, Self::Error> {
        Triangle::new(a, b, c).ok_or_else(|| format!("breakpoints [{a}, {b}, {c}] must be finite with a <= b <= c"))
    }
}

impl From<Triangle> for [f64; 3] {
    fn from(t: Triangle) -> Self {
        t.points()
    }
}

/// Index of a term within its variable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub(crate) usize);

impl TermId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named fuzzy set of a variable, with its degrees precomputed over the
/// variable's universe.
#[derive(Clone, Debug)]
pub struct Term {
    label: String,
    function: Triangle,
    samples: Vec<f64>,
}

impl Term {
    pub(crate) fn new(label: String, function: Triangle, universe: &[f64]) -> Self {
        let samples = function.sample(universe);

        Self {
            label,
            function,
            samples,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn function(&self) -> &Triangle {
        &self.function
    }

    /// Degrees at each universe point
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_shape() {
        let tri = Triangle::new(1450., 1550., 1600.).unwrap();

        assert_eq!(tri.degree(1400.), 0.);
        assert_eq!(tri.degree(1450.), 0.);
        assert_eq!(tri.degree(1500.), 0.5);
        assert_eq!(tri.degree(1550.), 1.);
        assert_eq!(tri.degree(1575.), 0.5);
        assert_eq!(tri.degree(1600.), 0.);
        assert_eq!(tri.degree(1700.), 0.);
    }

    #[test]
    fn test_left_shoulder_is_a_step() {
        let tri = Triangle::new(0., 0., 5.).unwrap();

        assert_eq!(tri.degree(-0.1), 0.);
        assert_eq!(tri.degree(0.), 1.);
        assert_eq!(tri.degree(4.), 0.2);
        assert_eq!(tri.degree(5.), 0.);
    }

    #[test]
    fn test_right_shoulder_is_a_step() {
        let tri = Triangle::new(0., 1., 1.).unwrap();

        assert_eq!(tri.degree(0.), 0.);
        assert_eq!(tri.degree(0.5), 0.5);
        assert_eq!(tri.degree(1.), 1.);
        assert_eq!(tri.degree(1.5), 0.);
    }

    #[test]
    fn test_degenerate_spike() {
        let tri = Triangle::new(2., 2., 2.).unwrap();

        assert_eq!(tri.degree(2.), 1.);
        assert_eq!(tri.degree(2.0001), 0.);
        assert_eq!(tri.degree(1.9999), 0.);
    }

    #[test]
    fn test_rejects_unordered_breakpoints() {
        assert!(Triangle::new(3., 2., 4.).is_none());
        assert!(Triangle::new(1., 5., 4.).is_none());
        assert!(Triangle::new(f64::NAN, 1., 2.).is_none());
        assert!(Triangle::new(0., 1., f64::INFINITY).is_none());
    }

    #[test]
    fn test_non_finite_inputs_have_no_membership() {
        let tri = Triangle::new(0., 0., 5.).unwrap();

        assert_eq!(tri.degree(f64::NAN), 0.);
        assert_eq!(tri.degree(f64::INFINITY), 0.);
        assert_eq!(tri.degree(f64::NEG_INFINITY), 0.);
    }

    #[test]
    fn test_sample_over_universe() {
        let tri = Triangle::new(0., 0., 1.).unwrap();

        assert_eq!(tri.sample(&[0., 1.]), vec![1., 0.]);
    }

    #[test]
    fn test_deserialize_from_array() {
        let tri: Triangle = serde_json::from_str("[3.0, 8.0, 10.0]").unwrap();
        assert_eq!(tri.points(), [3., 8., 10.]);

        assert!(serde_json::from_str::<Triangle>("[8.0, 3.0, 10.0]").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn triangle() -> impl Strategy<Value = Triangle> {
        (-1000.0f64..1000., 1.0f64..100., 1.0f64..100.)
            .prop_map(|(a, rise, fall)| Triangle::new(a, a + rise, a + rise + fall).unwrap())
    }

    proptest! {
        /// Property: degrees always lie in [0, 1]
        #[test]
        fn test_degree_is_bounded(tri in triangle(), x in -2000.0f64..2000.) {
            let d = tri.degree(x);
            prop_assert!((0. ..=1.).contains(&d), "degree {} out of range", d);
        }

        /// Property: nothing outside [a, c] belongs to the set
        #[test]
        fn test_zero_outside_support(tri in triangle(), offset in 1e-6f64..1000.) {
            let [a, _, c] = tri.points();
            prop_assert_eq!(tri.degree(a - offset), 0.);
            prop_assert_eq!(tri.degree(c + offset), 0.);
        }

        /// Property: the peak is always fully a member
        #[test]
        fn test_peak_is_one(tri in triangle()) {
            let [_, b, _] = tri.points();
            prop_assert_eq!(tri.degree(b), 1.);
        }

        /// Property: degree is non-decreasing up to the peak and non-increasing after it
        #[test]
        fn test_monotone_edges(tri in triangle(), t in 0.0f64..1., u in 0.0f64..1.) {
            let [a, b, c] = tri.points();
            let (lo, hi) = if t <= u { (t, u) } else { (u, t) };

            let (x1, x2) = (a + (b - a) * lo, a + (b - a) * hi);
            prop_assert!(tri.degree(x1) <= tri.degree(x2) + 1e-12);

            let (y1, y2) = (b + (c - b) * lo, b + (c - b) * hi);
            prop_assert!(tri.degree(y1) + 1e-12 >= tri.degree(y2));
        }
    }
}
