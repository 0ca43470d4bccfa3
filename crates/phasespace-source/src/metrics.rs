//! Per-run sampling metrics.
//!
//! Each worker fills its own [`SamplingMetrics`]; the driver merges them
//! after the workers finish.

use phasespace_core::{DimensionCounterMap, PhaseSpaceDimension};

/// Counts and totals collected while sampling histories.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SamplingMetrics {
    /// Histories attempted, successful or not.
    pub histories: u64,
    /// Histories that ended in an error.
    pub failures: u64,
    /// Samples rejected by the acceptance predicate and drawn again.
    pub rejections: u64,
    /// Internal sampling trials per dimension.
    pub trials: DimensionCounterMap,
    /// Sum of the statistical weights of accepted particles.
    pub total_weight: f64,
}

impl SamplingMetrics {
    /// Fold `other` into `self`.
    pub fn merge(&mut self, other: &SamplingMetrics) {
        self.histories += other.histories;
        self.failures += other.failures;
        self.rejections += other.rejections;
        for (&dimension, &count) in &other.trials {
            *self.trials.entry(dimension).or_insert(0) += count;
        }
        self.total_weight += other.total_weight;
    }

    /// Histories that produced a particle.
    pub fn successes(&self) -> u64 {
        self.histories - self.failures
    }

    /// Successful histories per trial in `dimension`.
    ///
    /// `None` when the dimension recorded no trials.
    pub fn dimension_sampling_efficiency(&self, dimension: PhaseSpaceDimension) -> Option<f64> {
        match self.trials.get(&dimension) {
            Some(&trials) if trials > 0 => Some(self.successes() as f64 / trials as f64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = SamplingMetrics::default();
        assert_eq!(m.histories, 0);
        assert_eq!(m.failures, 0);
        assert_eq!(m.rejections, 0);
        assert!(m.trials.is_empty());
        assert_eq!(m.total_weight, 0.0);
        assert_eq!(m.dimension_sampling_efficiency(PhaseSpaceDimension::Energy), None);
    }

    #[test]
    fn merge_adds_every_field() {
        let mut a = SamplingMetrics {
            histories: 3,
            failures: 1,
            rejections: 2,
            trials: [(PhaseSpaceDimension::Energy, 4)].into_iter().collect(),
            total_weight: 1.5,
        };
        let b = SamplingMetrics {
            histories: 2,
            failures: 0,
            rejections: 1,
            trials: [
                (PhaseSpaceDimension::Energy, 2),
                (PhaseSpaceDimension::Time, 2),
            ]
            .into_iter()
            .collect(),
            total_weight: 0.5,
        };
        a.merge(&b);
        assert_eq!(a.histories, 5);
        assert_eq!(a.failures, 1);
        assert_eq!(a.rejections, 3);
        assert_eq!(a.trials[&PhaseSpaceDimension::Energy], 6);
        assert_eq!(a.trials[&PhaseSpaceDimension::Time], 2);
        assert_eq!(a.total_weight, 2.0);
        assert_eq!(a.successes(), 4);
        assert_eq!(
            a.dimension_sampling_efficiency(PhaseSpaceDimension::Time),
            Some(2.0)
        );
    }
}
