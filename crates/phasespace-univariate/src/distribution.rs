//! The [`UnivariateDistribution`] and [`TabularUnivariateDistribution`] traits.

use phasespace_core::{DomainError, RandomNumberGenerator};
use std::fmt;

/// Closed set of concrete one-dimensional distribution forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnivariateDistributionType {
    /// Constant density on a closed interval.
    Uniform,
    /// Piecewise-constant density.
    Histogram,
    /// Truncated exponential.
    Exponential,
    /// Point mass.
    Delta,
    /// Truncated `x^n`.
    Power,
    /// Finite set of point masses.
    Discrete,
}

impl UnivariateDistributionType {
    /// Short name, e.g. `"Uniform"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "Uniform",
            Self::Histogram => "Histogram",
            Self::Exponential => "Exponential",
            Self::Delta => "Delta",
            Self::Power => "Power",
            Self::Discrete => "Discrete",
        }
    }
}

impl fmt::Display for UnivariateDistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Distribution", self.name())
    }
}

/// A one-dimensional distribution that can be evaluated and sampled.
///
/// # Object Safety
///
/// Used as `dyn UnivariateDistribution` inside the two-dimensional tables
/// and the independent dimension nodes.
///
/// # Thread Safety
///
/// Distributions are immutable after construction and shared across
/// sampling threads through `Arc`, hence `Send + Sync`.
pub trait UnivariateDistribution: fmt::Debug + Send + Sync {
    /// The concrete form of this distribution.
    fn distribution_type(&self) -> UnivariateDistributionType;

    /// Unnormalised density (the value the distribution was built with).
    fn evaluate(&self, x: f64) -> f64;

    /// Normalised probability density.
    ///
    /// For discrete forms this is the probability mass at `x`.
    fn evaluate_pdf(&self, x: f64) -> f64;

    /// Draw one sample.
    fn sample(&self, rng: &mut dyn RandomNumberGenerator) -> f64;

    /// Draw one sample, incrementing `trials` once per attempt.
    ///
    /// The concrete forms here never reject, so the count grows by
    /// exactly one.
    fn sample_and_record_trials(&self, rng: &mut dyn RandomNumberGenerator, trials: &mut u64) -> f64 {
        *trials += 1;
        self.sample(rng)
    }

    /// Lower limit of the support.
    fn lower_bound(&self) -> f64;

    /// Upper limit of the support.
    fn upper_bound(&self) -> f64;

    /// Whether the CDF is available in closed form.
    fn is_tabular(&self) -> bool;

    /// Whether the distribution has a density rather than point masses.
    fn is_continuous(&self) -> bool;

    /// Whether the distribution has the given form.
    fn has_form(&self, form: UnivariateDistributionType) -> bool {
        self.distribution_type() == form
    }

    /// Shorthand for `has_form(UnivariateDistributionType::Uniform)`.
    fn is_uniform(&self) -> bool {
        self.has_form(UnivariateDistributionType::Uniform)
    }
}

/// A distribution whose CDF can be evaluated and inverted exactly.
pub trait TabularUnivariateDistribution: UnivariateDistribution {
    /// Cumulative distribution at `x`, in `[0, 1]`.
    fn evaluate_cdf(&self, x: f64) -> f64;

    /// Invert the CDF at the canonical random number `r` in `[0, 1)`.
    fn sample_with_random_number(&self, r: f64) -> f64;

    /// Draw one sample and return the index of the bin it fell in.
    fn sample_and_record_bin_index(&self, rng: &mut dyn RandomNumberGenerator) -> (f64, usize);

    /// Draw one sample from the support truncated above at `max`.
    fn sample_in_subrange(
        &self,
        rng: &mut dyn RandomNumberGenerator,
        max: f64,
    ) -> Result<f64, DomainError> {
        let r = rng.next_uniform();
        self.sample_with_random_number_in_subrange(r, max)
    }

    /// Invert the CDF at `r` over the support truncated above at `max`.
    ///
    /// A `max` above the upper bound is clamped to it; one below the lower
    /// bound is an [`DomainError::InvalidSubrange`].
    fn sample_with_random_number_in_subrange(&self, r: f64, max: f64) -> Result<f64, DomainError> {
        let lower = self.lower_bound();
        if max < lower {
            return Err(DomainError::InvalidSubrange { max, lower });
        }
        let max = max.min(self.upper_bound());
        Ok(self.sample_with_random_number(r * self.evaluate_cdf(max)))
    }
}
