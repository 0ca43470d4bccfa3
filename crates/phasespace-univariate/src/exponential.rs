//! Truncated exponential density.

use crate::distribution::{UnivariateDistribution, UnivariateDistributionType};
use crate::validate::{require, require_finite};
use phasespace_core::{ConfigurationError, RandomNumberGenerator};

/// `constant * exp(-exponent * x)` on `[lower, upper]`.
///
/// `upper` may be `+inf` when `exponent > 0`. Not tabular: the engine only
/// samples it directly, never through a caller-supplied random number.
#[derive(Clone, Debug, PartialEq)]
pub struct Exponential {
    constant: f64,
    exponent: f64,
    lower: f64,
    upper: f64,
    exp_lower: f64,
    exp_upper: f64,
}

impl Exponential {
    /// Create a truncated exponential.
    pub fn new(
        constant: f64,
        exponent: f64,
        lower: f64,
        upper: f64,
    ) -> Result<Self, ConfigurationError> {
        const NAME: &str = "Exponential";
        require_finite(NAME, "constant", constant)?;
        require_finite(NAME, "exponent", exponent)?;
        require_finite(NAME, "lower limit", lower)?;
        require(NAME, constant > 0.0, || {
            format!("constant {constant} must be positive")
        })?;
        require(NAME, exponent > 0.0, || {
            format!("exponent {exponent} must be positive")
        })?;
        require(NAME, !upper.is_nan() && upper > lower, || {
            format!("upper limit {upper} must exceed lower limit {lower}")
        })?;
        let exp_lower = (-exponent * lower).exp();
        let exp_upper = (-exponent * upper).exp();
        require(NAME, exp_lower > exp_upper && exp_lower.is_finite(), || {
            format!("limits [{lower}, {upper}] give no representable probability mass")
        })?;
        Ok(Self {
            constant,
            exponent,
            lower,
            upper,
            exp_lower,
            exp_upper,
        })
    }

    fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }

    /// Invert the CDF at `r`.
    pub fn sample_with_random_number(&self, r: f64) -> f64 {
        let x = -(self.exp_lower - r * (self.exp_lower - self.exp_upper)).ln() / self.exponent;
        x.clamp(self.lower, self.upper)
    }
}

impl UnivariateDistribution for Exponential {
    fn distribution_type(&self) -> UnivariateDistributionType {
        UnivariateDistributionType::Exponential
    }

    fn evaluate(&self, x: f64) -> f64 {
        if self.contains(x) {
            self.constant * (-self.exponent * x).exp()
        } else {
            0.0
        }
    }

    fn evaluate_pdf(&self, x: f64) -> f64 {
        if self.contains(x) {
            self.exponent * (-self.exponent * x).exp() / (self.exp_lower - self.exp_upper)
        } else {
            0.0
        }
    }

    fn sample(&self, rng: &mut dyn RandomNumberGenerator) -> f64 {
        self.sample_with_random_number(rng.next_uniform())
    }

    fn lower_bound(&self) -> f64 {
        self.lower
    }

    fn upper_bound(&self) -> f64 {
        self.upper
    }

    fn is_tabular(&self) -> bool {
        false
    }

    fn is_continuous(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use phasespace_core::ReplayRng;
    use proptest::prelude::*;

    #[test]
    fn pdf_is_normalised_exponential() {
        let e = Exponential::new(1.0, 1.0, 0.6, 0.8).unwrap();
        let expected = (-0.6f64).exp() / ((-0.6f64).exp() - (-0.8f64).exp());
        assert!((e.evaluate_pdf(0.6) - expected).abs() < 1e-12);
        assert!((e.evaluate_pdf(0.6) / 5.0 - 1.1033311132253991).abs() < 1e-12);
        assert_eq!(e.evaluate_pdf(0.5), 0.0);
        assert!((e.evaluate(0.6) - (-0.6f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn replay_samples_hit_limits() {
        let e = Exponential::new(1.0, 1.0, 0.1, 0.9).unwrap();
        let mut rng = ReplayRng::new(vec![0.0, 1.0 - 1e-15]);
        assert!((e.sample(&mut rng) - 0.1).abs() < 1e-15);
        assert!((e.sample(&mut rng) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn semi_infinite_support() {
        let e = Exponential::new(2.0, 3.0, 0.0, f64::INFINITY).unwrap();
        assert!((e.evaluate_pdf(0.0) - 3.0).abs() < 1e-15);
        assert_eq!(e.upper_bound(), f64::INFINITY);
        assert!(e.sample_with_random_number(0.999).is_finite());
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(Exponential::new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(Exponential::new(1.0, 1.0, 1.0, 1.0).is_err());
        assert!(Exponential::new(-1.0, 1.0, 0.0, 1.0).is_err());
        assert!(Exponential::new(1.0, 1.0, f64::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn compliance() {
        let e = Exponential::new(1.0, 1.0, 0.1, 0.9).unwrap();
        assert!(!e.is_tabular());
        compliance::assert_pdf_zero_outside(&e);
    }

    proptest! {
        #[test]
        fn samples_stay_in_support(r in 0.0f64..1.0, rate in 0.1f64..10.0) {
            let e = Exponential::new(1.0, rate, 0.5, 1.5).unwrap();
            let x = e.sample_with_random_number(r);
            prop_assert!((0.5..=1.5).contains(&x));
        }
    }
}
