//! Reference two-dimensional tables.
//!
//! The numbers are chosen so that boundary values, bin interiors and
//! importance weights have closed forms the tests can check exactly.

use phasespace_bivariate::{
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

pub fn exponential(lower: f64, upper: f64) -> Arc<dyn UnivariateDistribution> {
    Arc::new(Exponential::new(1.0, 1.0, lower, upper).unwrap())
}

/// Grid `[0.1, 0.5, 0.9]`: `U(0.5, 0.9, 0.5)` then `U(0.6, 0.8, 0.4)`
/// twice, histogram policy.
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

/// Grid `[0.1, 0.5, 0.9]`: `U(0.5, 0.9, 0.5)` then `Exp(1, 1, 0.6, 0.8)`
/// twice, histogram policy.
pub fn exponential_table() -> PartiallyTabularTwoDDistribution {
    let first: Arc<dyn UnivariateDistribution> = Arc::new(Uniform::new(0.5, 0.9, 0.5).unwrap());
    let exp = exponential(0.6, 0.8);
    PartiallyTabularTwoDDistribution::partially_tabular(
        vec![0.1, 0.5, 0.9],
        vec![first, Arc::clone(&exp), exp],
        TwoDGridPolicy::Histogram,
    )
    .unwrap()
}

/// Grid `[0, 0, 1, 2]` with a discontinuity at `0`, histogram policy.
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

/// Grid `[0, 1]`: `U(0, 1, 1)` then `U(1, 3, 0.5)` under `policy`.
pub fn two_uniforms(policy: TwoDGridPolicy) -> FullyTabularTwoDDistribution {
    FullyTabularTwoDDistribution::fully_tabular(
        vec![0.0, 1.0],
        vec![uniform(0.0, 1.0, 1.0), uniform(1.0, 3.0, 0.5)],
        policy,
    )
    .unwrap()
}
