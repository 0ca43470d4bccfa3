//! Constant density on a closed interval.

use crate::distribution::{
    TabularUnivariateDistribution, UnivariateDistribution, UnivariateDistributionType,
};
use crate::validate::{require, require_finite};
use phasespace_core::{ConfigurationError, DomainError, RandomNumberGenerator};

/// Uniform distribution on `[min, max]` with unnormalised value `multiplier`.
///
/// # Examples
///
/// ```
/// use phasespace_univariate::{Uniform, UnivariateDistribution};
///
/// let u = Uniform::new(0.5, 0.9, 0.5).unwrap();
/// assert_eq!(u.evaluate(0.7), 0.5);
/// assert!((u.evaluate_pdf(0.7) - 2.5).abs() < 1e-12);
/// assert_eq!(u.evaluate(1.0), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Uniform {
    min: f64,
    max: f64,
    multiplier: f64,
}

impl Uniform {
    /// Create a uniform distribution.
    ///
    /// Requires finite `min < max` and a finite, positive `multiplier`.
    pub fn new(min: f64, max: f64, multiplier: f64) -> Result<Self, ConfigurationError> {
        const NAME: &str = "Uniform";
        require_finite(NAME, "min", min)?;
        require_finite(NAME, "max", max)?;
        require_finite(NAME, "multiplier", multiplier)?;
        require(NAME, min < max, || format!("min {min} must be below max {max}"))?;
        require(NAME, multiplier > 0.0, || {
            format!("multiplier {multiplier} must be positive")
        })?;
        Ok(Self {
            min,
            max,
            multiplier,
        })
    }

    /// Unnormalised density on the support.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }
}

impl UnivariateDistribution for Uniform {
    fn distribution_type(&self) -> UnivariateDistributionType {
        UnivariateDistributionType::Uniform
    }

    fn evaluate(&self, x: f64) -> f64 {
        if self.contains(x) {
            self.multiplier
        } else {
            0.0
        }
    }

    fn evaluate_pdf(&self, x: f64) -> f64 {
        if self.contains(x) {
            1.0 / (self.max - self.min)
        } else {
            0.0
        }
    }

    fn sample(&self, rng: &mut dyn RandomNumberGenerator) -> f64 {
        self.sample_with_random_number(rng.next_uniform())
    }

    fn lower_bound(&self) -> f64 {
        self.min
    }

    fn upper_bound(&self) -> f64 {
        self.max
    }

    fn is_tabular(&self) -> bool {
        true
    }

    fn is_continuous(&self) -> bool {
        true
    }
}

impl TabularUnivariateDistribution for Uniform {
    fn evaluate_cdf(&self, x: f64) -> f64 {
        ((x - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    fn sample_with_random_number(&self, r: f64) -> f64 {
        self.min + r * (self.max - self.min)
    }

    fn sample_and_record_bin_index(&self, rng: &mut dyn RandomNumberGenerator) -> (f64, usize) {
        (self.sample(rng), 0)
    }

    fn sample_with_random_number_in_subrange(&self, r: f64, max: f64) -> Result<f64, DomainError> {
        if max < self.min {
            return Err(DomainError::InvalidSubrange {
                max,
                lower: self.min,
            });
        }
        let max = max.min(self.max);
        Ok(self.min + r * (max - self.min))
    }
}
