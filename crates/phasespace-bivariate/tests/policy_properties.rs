//! Properties every grid policy must satisfy.

use phasespace_bivariate::{
    FullyTabularTwoDDistribution, PrimaryLimitMode, TwoDGridPolicy, TwoDInterpPolicy,
};
use phasespace_univariate::{Histogram, TabularUnivariateDistribution, Uniform};
use proptest::prelude::*;
use std::sync::Arc;

const MODE: PrimaryLimitMode = PrimaryLimitMode::Limit;

fn table(policy: TwoDGridPolicy) -> FullyTabularTwoDDistribution {
    let dists: Vec<Arc<dyn TabularUnivariateDistribution>> = vec![
        Arc::new(Uniform::new(1.0, 2.0, 1.0).unwrap()),
        Arc::new(Histogram::new(vec![1.5, 2.0, 4.0], vec![2.0, 1.0]).unwrap()),
        Arc::new(Uniform::new(2.0, 8.0, 3.0).unwrap()),
    ];
    FullyTabularTwoDDistribution::fully_tabular(vec![1.0, 2.0, 4.0], dists, policy).unwrap()
}

fn policies() -> Vec<TwoDGridPolicy> {
    let mut out = vec![TwoDGridPolicy::Histogram];
    for interp in [
        TwoDInterpPolicy::LIN_LIN_LIN,
        TwoDInterpPolicy::LIN_LIN_LOG,
        TwoDInterpPolicy::LIN_LOG_LIN,
        TwoDInterpPolicy::LOG_LOG_LOG,
    ] {
        out.push(TwoDGridPolicy::Direct(interp));
        out.push(TwoDGridPolicy::UnitBase(interp));
        out.push(TwoDGridPolicy::Correlated(interp));
        out.push(TwoDGridPolicy::UnitBaseCorrelated(interp));
    }
    out
}

#[test]
fn grid_points_use_their_own_distribution() {
    for policy in policies() {
        let t = table(policy);
        assert_eq!(t.evaluate(2.0, 1.75, MODE), Ok(2.0), "{policy}");
        let y = t
            .sample_secondary_conditional_with_random_number(4.0, 0.5, MODE)
            .unwrap();
        // The last grid point closes the last histogram bin.
        let expected = match policy {
            TwoDGridPolicy::Histogram => 2.5,
            _ => 5.0,
        };
        assert!((y - expected).abs() < 1e-12, "{policy}: {y}");
    }
}

proptest! {
    #[test]
    fn samples_stay_within_secondary_bounds(
        index in 0usize..17,
        x in 1.0f64..4.0,
        r in 0.0f64..1.0,
    ) {
        let policy = policies()[index];
        let t = table(policy);
        let y = t.sample_secondary_conditional_with_random_number(x, r, MODE).unwrap();
        let lo = t.lower_bound_of_secondary_conditional_indep_var(x, MODE).unwrap();
        let hi = t.upper_bound_of_secondary_conditional_indep_var(x, MODE).unwrap();
        let tol = 1e-9 * hi.abs().max(1.0);
        prop_assert!(y >= lo - tol && y <= hi + tol, "{} sample {} outside [{}, {}]", policy, y, lo, hi);
    }

    // Linear dependent scales only: a log-interpolated CDF dips where one
    // boundary CDF leaves zero.
    #[test]
    fn cdf_is_monotone_and_bounded(
        index in 0usize..13,
        x in 1.0f64..4.0,
        a in 0.5f64..9.0,
        b in 0.5f64..9.0,
    ) {
        let policy = policies()[index];
        let t = table(policy);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let c_lo = t.evaluate_secondary_conditional_cdf(x, lo, MODE).unwrap();
        let c_hi = t.evaluate_secondary_conditional_cdf(x, hi, MODE).unwrap();
        prop_assert!((0.0..=1.0).contains(&c_lo));
        prop_assert!((0.0..=1.0).contains(&c_hi));
        prop_assert!(c_lo <= c_hi + 1e-12, "{} CDF decreased: {} -> {}", policy, c_lo, c_hi);
    }

    #[test]
    fn extend_mode_never_fails(x in -10.0f64..20.0, r in 0.0f64..1.0) {
        let t = table(TwoDGridPolicy::UnitBase(TwoDInterpPolicy::LIN_LIN_LIN));
        let y = t.sample_secondary_conditional_with_random_number(x, r, PrimaryLimitMode::Extend);
        prop_assert!(y.is_ok());
        let in_grid = (1.0..=4.0).contains(&x);
        prop_assert_eq!(
            t.sample_secondary_conditional_with_random_number(x, r, MODE).is_ok(),
            in_grid
        );
    }
}
