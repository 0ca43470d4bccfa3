//! Tables shared by the unit tests.

use crate::{
    FullyTabularTwoDDistribution, PartiallyTabularTwoDDistribution, TwoDGridPolicy,
};
use phasespace_univariate::{
    Delta, Exponential, TabularUnivariateDistribution, Uniform, UnivariateDistribution,
};
use std::sync::Arc;

pub fn uniform(min: f64, max: f64, multiplier: f64) -> Arc<dyn TabularUnivariateDistribution> {
    Arc::new(Uniform::new(min, max, multiplier).unwrap())
}

pub fn delta(location: f64) -> Arc<dyn TabularUnivariateDistribution> {
    Arc::new(Delta::at(location).unwrap())
}

/// Grid `[0.1, 0.5, 0.9]`: `U(0.5, 0.9, 0.5)` then `U(0.6, 0.8, 0.4)` twice.
pub fn histogram_table() -> FullyTabularTwoDDistribution {
    FullyTabularTwoDDistribution::fully_tabular(
        vec![0.1, 0.5, 0.9],
        vec![
            uniform(0.5, 0.9, 0.5),
            uniform(0.6, 0.8, 0.4),
            uniform(0.6, 0.8, 0.4),
        ],
        TwoDGridPolicy::Histogram,
    )
    .unwrap()
}

/// Grid `[0, 0, 1, 2]` with a discontinuity at `0`.
pub fn repeated_grid_table() -> FullyTabularTwoDDistribution {
    FullyTabularTwoDDistribution::fully_tabular(
        vec![0.0, 0.0, 1.0, 2.0],
        vec![
            delta(0.0),
            uniform(0.0, 10.0, 1.0),
            uniform(0.0, 10.0, 1.0),
            delta(0.0),
        ],
        TwoDGridPolicy::Histogram,
    )
    .unwrap()
}

/// Grid `[0.1, 0.5, 0.9]`: `U(0.5, 0.9, 0.5)` then `Exp(1, 1, 0.6, 0.8)`
/// twice.
pub fn exponential_table() -> PartiallyTabularTwoDDistribution {
    let first: Arc<dyn UnivariateDistribution> = Arc::new(Uniform::new(0.5, 0.9, 0.5).unwrap());
    let exp: Arc<dyn UnivariateDistribution> =
        Arc::new(Exponential::new(1.0, 1.0, 0.6, 0.8).unwrap());
    PartiallyTabularTwoDDistribution::partially_tabular(
        vec![0.1, 0.5, 0.9],
        vec![first, exp.clone(), exp],
        TwoDGridPolicy::Histogram,
    )
    .unwrap()
}

/// Grid `[0, 1]`: `U(0, 1, 1)` then `U(1, 3, 0.5)`.
pub fn two_uniforms(policy: TwoDGridPolicy) -> FullyTabularTwoDDistribution {
    FullyTabularTwoDDistribution::fully_tabular(
        vec![0.0, 1.0],
        vec![uniform(0.0, 1.0, 1.0), uniform(1.0, 3.0, 0.5)],
        policy,
    )
    .unwrap()
}
