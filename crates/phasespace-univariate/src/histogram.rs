//! Piecewise-constant density over contiguous bins.

use crate::distribution::{
    TabularUnivariateDistribution, UnivariateDistribution, UnivariateDistributionType,
};
use crate::validate::require;
use phasespace_core::{ConfigurationError, RandomNumberGenerator};

/// Histogram with `n + 1` strictly increasing boundaries and `n` bin values.
///
/// The last boundary closes the last bin: `evaluate(upper_bound())` returns
/// the last bin's value.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    boundaries: Vec<f64>,
    values: Vec<f64>,
    /// Normalised CDF at each boundary; `cdf[0] == 0`, last is `1`.
    cdf: Vec<f64>,
    norm: f64,
}

impl Histogram {
    /// Create a histogram from bin boundaries and per-bin values.
    pub fn new(boundaries: Vec<f64>, values: Vec<f64>) -> Result<Self, ConfigurationError> {
        const NAME: &str = "Histogram";
        require(NAME, boundaries.len() >= 2, || {
            format!("needs at least 2 boundaries, got {}", boundaries.len())
        })?;
        require(NAME, values.len() + 1 == boundaries.len(), || {
            format!(
                "{} boundaries need {} bin values, got {}",
                boundaries.len(),
                boundaries.len() - 1,
                values.len()
            )
        })?;
        require(NAME, boundaries.iter().all(|b| b.is_finite()), || {
            "boundaries must be finite".to_string()
        })?;
        require(NAME, boundaries.windows(2).all(|w| w[0] < w[1]), || {
            "boundaries must be strictly increasing".to_string()
        })?;
        require(
            NAME,
            values.iter().all(|v| v.is_finite() && *v >= 0.0),
            || "bin values must be finite and non-negative".to_string(),
        )?;

        let mut cdf = Vec::with_capacity(boundaries.len());
        cdf.push(0.0);
        let mut running = 0.0;
        for (i, v) in values.iter().enumerate() {
            running += v * (boundaries[i + 1] - boundaries[i]);
            cdf.push(running);
        }
        let norm = running;
        require(NAME, norm > 0.0, || "total area must be positive".to_string())?;
        for c in &mut cdf {
            *c /= norm;
        }
        if let Some(last) = cdf.last_mut() {
            *last = 1.0;
        }

        Ok(Self {
            boundaries,
            values,
            cdf,
            norm,
        })
    }

    /// Bin boundaries.
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Per-bin values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn bin_count(&self) -> usize {
        self.values.len()
    }

    /// Bin containing `x`, for `x` inside the support.
    fn bin_of(&self, x: f64) -> usize {
        let upper = self.boundaries.partition_point(|b| *b <= x);
        upper.saturating_sub(1).min(self.bin_count() - 1)
    }

    fn contains(&self, x: f64) -> bool {
        x >= self.boundaries[0] && x <= self.boundaries[self.bin_count()]
    }

    fn invert(&self, r: f64) -> (f64, usize) {
        let upper = self.cdf.partition_point(|c| *c <= r);
        let bin = upper.saturating_sub(1).min(self.bin_count() - 1);
        let lo = self.boundaries[bin];
        let value = self.values[bin];
        if value == 0.0 {
            return (lo, bin);
        }
        let x = lo + (r - self.cdf[bin]) * self.norm / value;
        (x.min(self.boundaries[bin + 1]), bin)
    }
}

impl UnivariateDistribution for Histogram {
    fn distribution_type(&self) -> UnivariateDistributionType {
        UnivariateDistributionType::Histogram
    }

    fn evaluate(&self, x: f64) -> f64 {
        if self.contains(x) {
            self.values[self.bin_of(x)]
        } else {
            0.0
        }
    }

    fn evaluate_pdf(&self, x: f64) -> f64 {
        self.evaluate(x) / self.norm
    }

    fn sample(&self, rng: &mut dyn RandomNumberGenerator) -> f64 {
        self.invert(rng.next_uniform()).0
    }

    fn lower_bound(&self) -> f64 {
        self.boundaries[0]
    }

    fn upper_bound(&self) -> f64 {
        self.boundaries[self.bin_count()]
    }

    fn is_tabular(&self) -> bool {
        true
    }

    fn is_continuous(&self) -> bool {
        true
    }
}

impl TabularUnivariateDistribution for Histogram {
    fn evaluate_cdf(&self, x: f64) -> f64 {
        if x < self.lower_bound() {
            return 0.0;
        }
        if x >= self.upper_bound() {
            return 1.0;
        }
        let bin = self.bin_of(x);
        self.cdf[bin] + (x - self.boundaries[bin]) * self.values[bin] / self.norm
    }

    fn sample_with_random_number(&self, r: f64) -> f64 {
        self.invert(r).0
    }

    fn sample_and_record_bin_index(&self, rng: &mut dyn RandomNumberGenerator) -> (f64, usize) {
        self.invert(rng.next_uniform())
    }
}
