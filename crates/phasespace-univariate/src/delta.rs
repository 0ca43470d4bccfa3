//! Point mass.

use crate::distribution::{
    TabularUnivariateDistribution, UnivariateDistribution, UnivariateDistributionType,
};
use crate::validate::{require, require_finite};
use phasespace_core::{ConfigurationError, DomainError, RandomNumberGenerator};

/// All probability at `location`.
///
/// Sampling never consumes a random number.
#[derive(Clone, Debug, PartialEq)]
pub struct Delta {
    location: f64,
    multiplier: f64,
}

impl Delta {
    /// Create a point mass at `location` with unnormalised value
    /// `multiplier`.
    pub fn new(location: f64, multiplier: f64) -> Result<Self, ConfigurationError> {
        const NAME: &str = "Delta";
        require_finite(NAME, "location", location)?;
        require_finite(NAME, "multiplier", multiplier)?;
        require(NAME, multiplier > 0.0, || {
            format!("multiplier {multiplier} must be positive")
        })?;
        Ok(Self {
            location,
            multiplier,
        })
    }

    /// A unit point mass at `location`.
    pub fn at(location: f64) -> Result<Self, ConfigurationError> {
        Self::new(location, 1.0)
    }

    /// Where the mass sits.
    pub fn location(&self) -> f64 {
        self.location
    }
}

impl UnivariateDistribution for Delta {
    fn distribution_type(&self) -> UnivariateDistributionType {
        UnivariateDistributionType::Delta
    }

    fn evaluate(&self, x: f64) -> f64 {
        if x == self.location {
            self.multiplier
        } else {
            0.0
        }
    }

    fn evaluate_pdf(&self, x: f64) -> f64 {
        if x == self.location {
            1.0
        } else {
            0.0
        }
    }

    fn sample(&self, _rng: &mut dyn RandomNumberGenerator) -> f64 {
        self.location
    }

    fn lower_bound(&self) -> f64 {
        self.location
    }

    fn upper_bound(&self) -> f64 {
        self.location
    }

    fn is_tabular(&self) -> bool {
        true
    }

    fn is_continuous(&self) -> bool {
        false
    }
}

impl TabularUnivariateDistribution for Delta {
    fn evaluate_cdf(&self, x: f64) -> f64 {
        if x < self.location {
            0.0
        } else {
            1.0
        }
    }

    fn sample_with_random_number(&self, _r: f64) -> f64 {
        self.location
    }

    fn sample_and_record_bin_index(&self, _rng: &mut dyn RandomNumberGenerator) -> (f64, usize) {
        (self.location, 0)
    }

    fn sample_in_subrange(
        &self,
        _rng: &mut dyn RandomNumberGenerator,
        max: f64,
    ) -> Result<f64, DomainError> {
        self.sample_with_random_number_in_subrange(0.0, max)
    }

    fn sample_with_random_number_in_subrange(&self, _r: f64, max: f64) -> Result<f64, DomainError> {
        if max < self.location {
            Err(DomainError::InvalidSubrange {
                max,
                lower: self.location,
            })
        } else {
            Ok(self.location)
        }
    }
}
