use num::Float;
use serde::{Deserialize, Serialize};

use crate::math::interp;

/// And operator method for combining the propositions of an `all` clause
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
}

impl AndOp {
    /// Neutral element: folding from here leaves the first operand unchanged
    pub fn identity<F: Float>(self) -> F {
        F::one()
    }

    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
        }
    }
}

/// Or operator method for combining the propositions of an `any` clause
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
}

impl OrOp {
    pub fn identity<F: Float>(self) -> F {
        F::zero()
    }

    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
        }
    }
}

/// Implication operator: shapes a consequent term by the activation of the
/// rules concluding on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Mamdani: clip the term at the activation level
    #[default]
    Min,
    /// Larsen: scale the term by the activation level
    Prod,
}

impl ImplicationOp {
    pub fn call<F: Float>(self, activation: F, membership: impl IntoIterator<Item = F>) -> impl Iterator<Item = F> {
        membership.into_iter().map(move |m| match self {
            Self::Min => F::min(activation, m),
            Self::Prod => activation * m,
        })
    }
}

/// Method for aggregating the consequences of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionLink {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
}

impl ProductionLink {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
        }
    }

    /// Pointwise combination of two membership curves
    pub fn call<F: Float>(
        self,
        u: impl IntoIterator<Item = F>,
        v: impl IntoIterator<Item = F>,
    ) -> impl Iterator<Item = F> {
        u.into_iter().zip(v).map(move |(u, v)| self.apply(u, v))
    }
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Average of the universe samples weighted by their membership
    #[default]
    Centroid,
    /// Center of Gravity of the piecewise-linear membership curve
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    /// Crisp value of `membership` sampled over `universe`, or `None` when
    /// the curve carries no mass to locate.
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> Option<F> {
        debug_assert_eq!(universe.len(), membership.len());

        if membership.iter().all(|m| *m <= F::zero()) {
            return None;
        }

        let crisp = match self {
            Self::Centroid => {
                let (num, den) = universe
                    .iter()
                    .zip(membership)
                    .fold((F::zero(), F::zero()), |(num, den), (&u, &m)| (num + u * m, den + m));

                num / den
            },
            Self::Cog => {
                let two = F::one() + F::one();
                let three = two + F::one();
                let mut num = F::zero();
                let mut den = F::zero();

                for (u, m) in universe.windows(2).zip(membership.windows(2)) {
                    let base = u[1] - u[0];
                    let area_rect = F::min(m[0], m[1]) * base;
                    let center_rect = u[0] + base / two;
                    let area_tria = base * F::abs(m[1] - m[0]) / two;
                    let center_tria = if m[1] > m[0] {
                        u[0] + two / three * base
                    } else {
                        u[0] + F::one() / three * base
                    };

                    num = num + area_rect * center_rect + area_tria * center_tria;
                    den = den + area_rect + area_tria;
                }

                if den == F::zero() {
                    return None;
                }

                num / den
            },
            Self::Boa => {
                let two = F::one() + F::one();
                let areas: Vec<F> = universe
                    .windows(2)
                    .zip(membership.windows(2))
                    .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
                    .collect();
                let total_area = areas.iter().fold(F::zero(), |acc, a| acc + *a);

                if total_area == F::zero() {
                    return None;
                }

                let target = total_area / two;
                let mut cum_area = F::zero();
                let mut i_area = areas.len() - 1;

                for (i, area) in areas.iter().enumerate() {
                    cum_area = cum_area + *area;
                    if cum_area >= target {
                        i_area = i;
                        break;
                    }
                }

                // Locate the target within the segment that crosses it
                let coords = [
                    (cum_area - areas[i_area], universe[i_area]),
                    (cum_area, universe[i_area + 1]),
                ];

                interp(Some(target), coords).into_iter().next()?
            },
            Self::Mom | Self::Lom | Self::Som => {
                let maximum = membership.iter().copied().fold(F::neg_infinity(), F::max);
                let mut at_max = universe
                    .iter()
                    .zip(membership)
                    .filter_map(|(&u, &m)| if m == maximum { Some(u) } else { None });

                match self {
                    Self::Lom => at_max.fold(F::neg_infinity(), F::max),
                    Self::Som => at_max.fold(F::infinity(), F::min),
                    _ => {
                        let first = at_max.next()?;
                        let (len, sum) = at_max.fold((1usize, first), |(len, sum), u| (len + 1, sum + u));

                        sum / F::from(len)?
                    },
                }
            },
        };

        Some(crisp)
    }
}
