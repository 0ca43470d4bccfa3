//! Truncated power-law density `c * x^n`.

use crate::distribution::{UnivariateDistribution, UnivariateDistributionType};
use crate::validate::{require, require_finite};
use phasespace_core::{ConfigurationError, RandomNumberGenerator};

/// `constant * x^n` on `[lower, upper]` with `0 <= lower < upper`.
#[derive(Clone, Debug, PartialEq)]
pub struct Power {
    n: u32,
    constant: f64,
    lower: f64,
    upper: f64,
    lower_pow: f64,
    upper_pow: f64,
}

impl Power {
    /// Create a power-law distribution of integer order `n`.
    pub fn new(n: u32, constant: f64, lower: f64, upper: f64) -> Result<Self, ConfigurationError> {
        const NAME: &str = "Power";
        require_finite(NAME, "constant", constant)?;
        require_finite(NAME, "lower limit", lower)?;
        require_finite(NAME, "upper limit", upper)?;
        require(NAME, constant > 0.0, || {
            format!("constant {constant} must be positive")
        })?;
        require(NAME, lower >= 0.0, || {
            format!("lower limit {lower} must be non-negative")
        })?;
        require(NAME, upper > lower, || {
            format!("upper limit {upper} must exceed lower limit {lower}")
        })?;
        let order = f64::from(n + 1);
        Ok(Self {
            n,
            constant,
            lower,
            upper,
            lower_pow: lower.powf(order),
            upper_pow: upper.powf(order),
        })
    }

    fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }

    fn order(&self) -> f64 {
        f64::from(self.n + 1)
    }

    /// Invert the CDF at `r`.
    pub fn sample_with_random_number(&self, r: f64) -> f64 {
        let x = (r * (self.upper_pow - self.lower_pow) + self.lower_pow).powf(1.0 / self.order());
        x.clamp(self.lower, self.upper)
    }
}

impl UnivariateDistribution for Power {
    fn distribution_type(&self) -> UnivariateDistributionType {
        UnivariateDistributionType::Power
    }

    fn evaluate(&self, x: f64) -> f64 {
        if self.contains(x) {
            self.constant * x.powi(self.n as i32)
        } else {
            0.0
        }
    }

    fn evaluate_pdf(&self, x: f64) -> f64 {
        if self.contains(x) {
            self.order() * x.powi(self.n as i32) / (self.upper_pow - self.lower_pow)
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
    use proptest::prelude::*;

    #[test]
    fn quadratic() {
        let p = Power::new(2, 3.0, 0.0, 1.0).unwrap();
        assert!((p.evaluate(0.5) - 0.75).abs() < 1e-15);
        assert!((p.evaluate_pdf(0.5) - 0.75).abs() < 1e-15);
        assert_eq!(p.sample_with_random_number(0.0), 0.0);
        assert!((p.sample_with_random_number(0.125) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_negative_support() {
        assert!(Power::new(1, 1.0, -1.0, 1.0).is_err());
        assert!(Power::new(1, 1.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn compliance() {
        compliance::assert_pdf_zero_outside(&Power::new(3, 1.0, 1.0, 2.0).unwrap());
    }

    proptest! {
        #[test]
        fn samples_stay_in_support(n in 0u32..6, r in 0.0f64..1.0) {
            let p = Power::new(n, 1.0, 0.5, 2.0).unwrap();
            let x = p.sample_with_random_number(r);
            prop_assert!((0.5..=2.0).contains(&x));
        }
    }
}
