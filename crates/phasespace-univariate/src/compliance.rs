//! UnivariateDistribution trait compliance test helpers.
//!
//! These functions verify that a distribution satisfies the invariants the
//! two-dimensional engine relies on. Reused across every distribution's
//! test module.

use crate::distribution::{TabularUnivariateDistribution, UnivariateDistribution};

const PROBES: [f64; 7] = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0 - 1e-12];

/// Assert that inverse-CDF samples lie inside `[lower, upper]`.
pub fn assert_samples_in_support(dist: &dyn TabularUnivariateDistribution) {
    let (lo, hi) = (dist.lower_bound(), dist.upper_bound());
    for r in PROBES {
        let x = dist.sample_with_random_number(r);
        assert!(
            x >= lo && x <= hi,
            "sample {x} for r = {r} outside [{lo}, {hi}] for {dist:?}"
        );
    }
}

/// Assert that the CDF is non-decreasing and spans `[0, 1]`.
pub fn assert_cdf_monotone(dist: &dyn TabularUnivariateDistribution) {
    let (lo, hi) = (dist.lower_bound(), dist.upper_bound());
    let below = if lo == 0.0 { -1.0 } else { lo - lo.abs() };
    assert_eq!(dist.evaluate_cdf(below), 0.0, "CDF below support for {dist:?}");
    assert!(
        (dist.evaluate_cdf(hi) - 1.0).abs() < 1e-12,
        "CDF at upper bound is {} for {dist:?}",
        dist.evaluate_cdf(hi)
    );
    let mut prev = 0.0;
    for i in 0..=64u32 {
        let x = lo + (hi - lo) * f64::from(i) / 64.0;
        let c = dist.evaluate_cdf(x);
        assert!(c >= prev - 1e-15, "CDF decreased at {x} for {dist:?}");
        prev = c;
    }
}

/// Assert that the PDF vanishes outside the support.
pub fn assert_pdf_zero_outside<D: UnivariateDistribution + ?Sized>(dist: &D) {
    let (lo, hi) = (dist.lower_bound(), dist.upper_bound());
    let span = (hi - lo).max(1.0);
    assert_eq!(dist.evaluate_pdf(lo - span), 0.0);
    assert_eq!(dist.evaluate_pdf(hi + span), 0.0);
    assert_eq!(dist.evaluate(lo - span), 0.0);
    assert_eq!(dist.evaluate(hi + span), 0.0);
}

/// Run every tabular check.
pub fn assert_tabular_contract(dist: &dyn TabularUnivariateDistribution) {
    assert!(dist.is_tabular());
    assert_samples_in_support(dist);
    assert_cdf_monotone(dist);
    assert_pdf_zero_outside(dist);
}
