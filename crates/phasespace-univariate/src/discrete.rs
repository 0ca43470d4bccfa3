//! Finite set of weighted point masses.

use crate::distribution::{
    TabularUnivariateDistribution, UnivariateDistribution, UnivariateDistributionType,
};
use crate::validate::require;
use phasespace_core::{ConfigurationError, RandomNumberGenerator};

/// Point masses at strictly increasing `values` with relative `weights`.
#[derive(Clone, Debug, PartialEq)]
pub struct Discrete {
    values: Vec<f64>,
    weights: Vec<f64>,
    /// Normalised CDF after each value; last entry is `1`.
    cdf: Vec<f64>,
    total: f64,
}

impl Discrete {
    /// Create a discrete distribution.
    pub fn new(values: Vec<f64>, weights: Vec<f64>) -> Result<Self, ConfigurationError> {
        const NAME: &str = "Discrete";
        require(NAME, !values.is_empty(), || "needs at least one value".to_string())?;
        require(NAME, values.len() == weights.len(), || {
            format!(
                "{} values but {} weights",
                values.len(),
                weights.len()
            )
        })?;
        require(NAME, values.iter().all(|v| v.is_finite()), || {
            "values must be finite".to_string()
        })?;
        require(NAME, values.windows(2).all(|w| w[0] < w[1]), || {
            "values must be strictly increasing".to_string()
        })?;
        require(
            NAME,
            weights.iter().all(|w| w.is_finite() && *w >= 0.0),
            || "weights must be finite and non-negative".to_string(),
        )?;
        let total: f64 = weights.iter().sum();
        require(NAME, total > 0.0, || "total weight must be positive".to_string())?;

        let mut running = 0.0;
        let mut cdf: Vec<f64> = weights
            .iter()
            .map(|w| {
                running += w;
                running / total
            })
            .collect();
        if let Some(last) = cdf.last_mut() {
            *last = 1.0;
        }

        Ok(Self {
            values,
            weights,
            cdf,
            total,
        })
    }

    fn position(&self, x: f64) -> Option<usize> {
        self.values.binary_search_by(|v| v.total_cmp(&x)).ok()
    }

    fn invert(&self, r: f64) -> (f64, usize) {
        let i = self
            .cdf
            .partition_point(|c| *c <= r)
            .min(self.values.len() - 1);
        (self.values[i], i)
    }
}

impl UnivariateDistribution for Discrete {
    fn distribution_type(&self) -> UnivariateDistributionType {
        UnivariateDistributionType::Discrete
    }

    fn evaluate(&self, x: f64) -> f64 {
        self.position(x).map_or(0.0, |i| self.weights[i])
    }

    fn evaluate_pdf(&self, x: f64) -> f64 {
        self.evaluate(x) / self.total
    }

    fn sample(&self, rng: &mut dyn RandomNumberGenerator) -> f64 {
        self.invert(rng.next_uniform()).0
    }

    fn lower_bound(&self) -> f64 {
        self.values[0]
    }

    fn upper_bound(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    fn is_tabular(&self) -> bool {
        true
    }

    fn is_continuous(&self) -> bool {
        false
    }
}

impl TabularUnivariateDistribution for Discrete {
    fn evaluate_cdf(&self, x: f64) -> f64 {
        match self.values.partition_point(|v| *v <= x) {
            0 => 0.0,
            n => self.cdf[n - 1],
        }
    }

    fn sample_with_random_number(&self, r: f64) -> f64 {
        self.invert(r).0
    }

    fn sample_and_record_bin_index(&self, rng: &mut dyn RandomNumberGenerator) -> (f64, usize) {
        self.invert(rng.next_uniform())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    fn dice() -> Discrete {
        Discrete::new(vec![-1.0, 0.0, 1.0], vec![1.0, 2.0, 1.0]).unwrap()
    }

    #[test]
    fn masses() {
        let d = dice();
        assert_eq!(d.evaluate(0.0), 2.0);
        assert_eq!(d.evaluate(0.5), 0.0);
        assert_eq!(d.evaluate_pdf(0.0), 0.5);
        assert_eq!(d.evaluate_cdf(-2.0), 0.0);
        assert_eq!(d.evaluate_cdf(-1.0), 0.25);
        assert_eq!(d.evaluate_cdf(0.5), 0.75);
        assert_eq!(d.evaluate_cdf(1.0), 1.0);
    }

    #[test]
    fn first_value_with_r_below_cdf() {
        let d = dice();
        assert_eq!(d.sample_with_random_number(0.0), -1.0);
        assert_eq!(d.sample_with_random_number(0.25), 0.0);
        assert_eq!(d.sample_with_random_number(0.74), 0.0);
        assert_eq!(d.sample_with_random_number(0.75), 1.0);
        assert_eq!(d.sample_with_random_number(1.0 - 1e-15), 1.0);
    }

    #[test]
    fn subrange_truncates_upper_masses() {
        let d = dice();
        assert_eq!(d.sample_with_random_number_in_subrange(0.9, 0.0), Ok(0.0));
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(Discrete::new(vec![], vec![]).is_err());
        assert!(Discrete::new(vec![1.0, 0.0], vec![1.0, 1.0]).is_err());
        assert!(Discrete::new(vec![0.0], vec![0.0]).is_err());
        assert!(Discrete::new(vec![0.0, 1.0], vec![1.0]).is_err());
    }

    #[test]
    fn compliance() {
        compliance::assert_tabular_contract(&dice());
    }
}
