//! Sampling the secondary variable conditioned on a primary value.

use crate::distribution::{
    Bracket, FullyTabularTwoDDistribution, SecondaryDistribution, TwoDDistribution,
};
use crate::policy::{PrimaryLimitMode, TwoDGridPolicy};
use phasespace_core::{DomainError, RandomNumberGenerator};
use phasespace_univariate::TabularUnivariateDistribution;

/// A secondary sample together with where it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinSample {
    /// The sample, rescaled onto the intermediate grid where the policy
    /// requires it.
    pub value: f64,
    /// The sample as drawn from the boundary distribution.
    ///
    /// Equal to `value` for correlated samples, which span both
    /// boundaries.
    pub raw: f64,
    /// Index of the boundary distribution that was sampled; the lower one
    /// for correlated samples.
    pub primary_bin_index: usize,
    /// Bin of the boundary distribution the raw sample fell in; `0` for
    /// correlated samples.
    pub secondary_bin_index: usize,
}

/// Random numbers for one sample: a live stream, or a single caller
/// value reused for every decision.
enum Draw<'a> {
    Stream(&'a mut dyn RandomNumberGenerator),
    Fixed(f64),
}

impl Draw<'_> {
    /// Whether to take the upper boundary of a bin at `fraction`.
    ///
    /// A fixed number is rescaled onto the chosen branch so it stays
    /// uniform for the inversion that follows.
    fn pick_upper(&mut self, fraction: f64) -> bool {
        match self {
            Self::Stream(rng) => rng.next_uniform() < fraction,
            Self::Fixed(r) => {
                if *r < fraction {
                    *r /= fraction;
                    true
                } else {
                    *r = (*r - fraction) / (1.0 - fraction);
                    false
                }
            }
        }
    }

    fn uniform(&mut self) -> f64 {
        match self {
            Self::Stream(rng) => rng.next_uniform(),
            Self::Fixed(r) => *r,
        }
    }

    /// Invert `d`, optionally truncated above at `max`.
    fn invert(
        &mut self,
        d: &dyn TabularUnivariateDistribution,
        max: Option<f64>,
    ) -> Result<f64, DomainError> {
        match (self, max) {
            (Self::Stream(rng), None) => Ok(d.sample(&mut **rng)),
            (Self::Stream(rng), Some(max)) => d.sample_in_subrange(&mut **rng, max),
            (Self::Fixed(r), None) => Ok(d.sample_with_random_number(*r)),
            (Self::Fixed(r), Some(max)) => d.sample_with_random_number_in_subrange(*r, max),
        }
    }
}

impl<D: SecondaryDistribution + ?Sized> TwoDDistribution<D> {
    fn sample_with(
        &self,
        x: f64,
        rng: &mut dyn RandomNumberGenerator,
        mode: PrimaryLimitMode,
        draw: impl Fn(&D, &mut dyn RandomNumberGenerator) -> (f64, usize),
    ) -> Result<BinSample, DomainError> {
        let i = match self.bracket(x, mode)? {
            Bracket::Single(i) => {
                let (raw, secondary_bin_index) = draw(&*self.secondary[i], rng);
                return Ok(BinSample {
                    value: raw,
                    raw,
                    primary_bin_index: i,
                    secondary_bin_index,
                });
            }
            Bracket::Between(i) => i,
        };
        let bin = self.bin(i, x);
        if self.policy.is_correlated() {
            if let (Some(t0), Some(t1)) = (bin.lower.as_tabular(), bin.upper.as_tabular()) {
                let value = bin.correlated(t0, t1, rng.next_uniform());
                return Ok(BinSample {
                    value,
                    raw: value,
                    primary_bin_index: i,
                    secondary_bin_index: 0,
                });
            }
        }
        let upper = rng.next_uniform() < bin.fraction;
        let (j, d) = if upper { (i + 1, bin.upper) } else { (i, bin.lower) };
        let (raw, secondary_bin_index) = draw(d, rng);
        let value = match self.policy {
            TwoDGridPolicy::Direct(_) | TwoDGridPolicy::Histogram => raw,
            _ => bin.rescale(d, raw),
        };
        Ok(BinSample {
            value,
            raw,
            primary_bin_index: j,
            secondary_bin_index,
        })
    }

    /// Sample the secondary variable given primary value `x`.
    pub fn sample_secondary_conditional(
        &self,
        x: f64,
        rng: &mut dyn RandomNumberGenerator,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        Ok(self.sample_with(x, rng, mode, |d, rng| (d.sample(rng), 0))?.value)
    }

    /// Sample the secondary variable, incrementing `trials` once for a
    /// successful sample and leaving it alone on error.
    pub fn sample_secondary_conditional_and_record_trials(
        &self,
        x: f64,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut u64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        let value = self.sample_secondary_conditional(x, rng, mode)?;
        *trials += 1;
        Ok(value)
    }
}

impl FullyTabularTwoDDistribution {
    /// Sample and report the primary and secondary bins used.
    pub fn sample_secondary_conditional_and_record_bin_indices(
        &self,
        x: f64,
        rng: &mut dyn RandomNumberGenerator,
        mode: PrimaryLimitMode,
    ) -> Result<BinSample, DomainError> {
        self.sample_with(x, rng, mode, |d, rng| d.sample_and_record_bin_index(rng))
    }

    fn sample_drawn(
        &self,
        x: f64,
        mut draw: Draw<'_>,
        max: Option<f64>,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        let i = match self.bracket(x, mode)? {
            Bracket::Single(i) => return draw.invert(&*self.secondary[i], max),
            Bracket::Between(i) => i,
        };
        let bin = self.bin(i, x);
        if let Some(max) = max {
            let (lower, _) = match self.policy {
                TwoDGridPolicy::Direct(_) => bin.envelope(),
                _ => bin.limits(),
            };
            if max < lower {
                return Err(DomainError::InvalidSubrange { max, lower });
            }
        }
        let cap = |d: &(dyn TabularUnivariateDistribution + 'static)| -> Option<f64> {
            max.map(|m| match self.policy {
                TwoDGridPolicy::Direct(_) => m,
                _ => bin.subrange_cap(d, m),
            })
        };
        if self.policy.is_correlated() {
            let r = draw.uniform();
            let mut fixed = Draw::Fixed(r);
            let y0 = fixed.invert(bin.lower, cap(bin.lower))?;
            let y1 = fixed.invert(bin.upper, cap(bin.upper))?;
            let value = bin.correlate(y0, y1);
            return Ok(max.map_or(value, |m| value.min(m)));
        }
        let d = if draw.pick_upper(bin.fraction) {
            bin.upper
        } else {
            bin.lower
        };
        let raw = draw.invert(d, cap(d))?;
        Ok(match self.policy {
            TwoDGridPolicy::Direct(_) | TwoDGridPolicy::Histogram => raw,
            _ => bin.rescale(d, raw),
        })
    }

    /// Invert the conditional distribution at the caller's random number
    /// `r`.
    ///
    /// Stochastic policies use `r` both to choose a boundary and, rescaled,
    /// to invert it.
    pub fn sample_secondary_conditional_with_random_number(
        &self,
        x: f64,
        r: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        self.sample_drawn(x, Draw::Fixed(r), None, mode)
    }

    /// Sample the secondary variable truncated above at `max`.
    pub fn sample_secondary_conditional_in_subrange(
        &self,
        x: f64,
        rng: &mut dyn RandomNumberGenerator,
        max: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        self.sample_drawn(x, Draw::Stream(rng), Some(max), mode)
    }

    /// Invert the conditional distribution truncated above at `max` at the
    /// caller's random number `r`.
    pub fn sample_secondary_conditional_with_random_number_in_subrange(
        &self,
        x: f64,
        r: f64,
        max: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        self.sample_drawn(x, Draw::Fixed(r), Some(max), mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{exponential_table, histogram_table, repeated_grid_table, two_uniforms};
    use crate::interp::TwoDInterpPolicy;
    use phasespace_core::ReplayRng;

    const LIMIT: PrimaryLimitMode = PrimaryLimitMode::Limit;
    const EXTEND: PrimaryLimitMode = PrimaryLimitMode::Extend;
    const LIN: TwoDInterpPolicy = TwoDInterpPolicy::LIN_LIN_LIN;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn replayed_boundary_samples() {
        let t = histogram_table();
        let mut rng = ReplayRng::new(vec![0.0, 0.5, 1.0 - 1e-15]);
        let expected = [0.5, 0.7, 0.9];
        for e in expected {
            let y = t.sample_secondary_conditional(0.1, &mut rng, LIMIT).unwrap();
            assert!(close(y, e, 1e-15), "expected {e}, got {y}");
        }
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn histogram_bin_samples_lower_boundary() {
        let t = histogram_table();
        let mut rng = ReplayRng::new(vec![0.5]);
        let y = t.sample_secondary_conditional(0.3, &mut rng, LIMIT).unwrap();
        assert!(close(y, 0.7, 1e-15));
        // No boundary selection draw for a histogram bin.
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn out_of_range_sampling_obeys_mode() {
        let t = histogram_table();
        let mut rng = ReplayRng::new(vec![0.0]);
        assert!(matches!(
            t.sample_secondary_conditional(0.05, &mut rng, LIMIT),
            Err(DomainError::PrimaryOutOfRange { .. })
        ));
        assert!(t.sample_secondary_conditional(1.0, &mut rng, LIMIT).is_err());
        assert_eq!(rng.draws(), 0);
        assert_eq!(t.sample_secondary_conditional(0.05, &mut rng, EXTEND), Ok(0.5));
        assert_eq!(t.sample_secondary_conditional(1.0, &mut rng, EXTEND), Ok(0.6));
        assert!(t.sample_secondary_conditional(0.05, &mut rng, LIMIT).is_err());
    }

    #[test]
    fn repeated_grid_bin_indices_and_trials() {
        let t = repeated_grid_table();
        let mut rng = ReplayRng::new(vec![0.5]);
        let s = t
            .sample_secondary_conditional_and_record_bin_indices(0.0, &mut rng, LIMIT)
            .unwrap();
        assert_eq!(s.primary_bin_index, 1);
        assert!(close(s.value, 5.0, 1e-15));
        for x in [1.0, 2.0] {
            let s = t
                .sample_secondary_conditional_and_record_bin_indices(x, &mut rng, LIMIT)
                .unwrap();
            assert_eq!(s.primary_bin_index, 2);
        }
        let s = t
            .sample_secondary_conditional_and_record_bin_indices(3.0, &mut rng, EXTEND)
            .unwrap();
        assert_eq!(s.primary_bin_index, 3);
        assert_eq!(s.value, 0.0);

        let mut trials = 0;
        for x in [0.0, 1.0, 2.0] {
            t.sample_secondary_conditional_and_record_trials(x, &mut rng, &mut trials, LIMIT)
                .unwrap();
        }
        assert_eq!(trials, 3);
        assert!(t
            .sample_secondary_conditional_and_record_trials(3.0, &mut rng, &mut trials, LIMIT)
            .is_err());
        assert_eq!(trials, 3);
    }

    #[test]
    fn direct_picks_a_boundary_and_keeps_the_raw_sample() {
        let t = two_uniforms(TwoDGridPolicy::Direct(LIN));
        let mut rng = ReplayRng::new(vec![0.1, 0.5, 0.3, 0.5]);
        let s = t
            .sample_secondary_conditional_and_record_bin_indices(0.25, &mut rng, LIMIT)
            .unwrap();
        assert_eq!(s.primary_bin_index, 1);
        assert_eq!((s.value, s.raw), (2.0, 2.0));
        let s = t
            .sample_secondary_conditional_and_record_bin_indices(0.25, &mut rng, LIMIT)
            .unwrap();
        assert_eq!(s.primary_bin_index, 0);
        assert_eq!(s.value, 0.5);
    }

    #[test]
    fn unit_base_rescales_the_raw_sample() {
        let t = two_uniforms(TwoDGridPolicy::UnitBase(LIN));
        let mut rng = ReplayRng::new(vec![0.25, 0.5]);
        let s = t
            .sample_secondary_conditional_and_record_bin_indices(0.5, &mut rng, LIMIT)
            .unwrap();
        assert_eq!(s.primary_bin_index, 1);
        assert_eq!(s.raw, 2.0);
        assert!(close(s.value, 1.25, 1e-15));
    }

    #[test]
    fn caller_random_number_is_reused_for_the_boundary_pick() {
        let t = two_uniforms(TwoDGridPolicy::Direct(LIN));
        let upper = t
            .sample_secondary_conditional_with_random_number(0.25, 0.1, LIMIT)
            .unwrap();
        assert!(close(upper, 1.8, 1e-12));
        let lower = t
            .sample_secondary_conditional_with_random_number(0.25, 0.625, LIMIT)
            .unwrap();
        assert!(close(lower, 0.5, 1e-15));
        // On a boundary the number is used directly.
        assert_eq!(
            t.sample_secondary_conditional_with_random_number(1.0, 0.5, LIMIT),
            Ok(2.0)
        );
    }

    #[test]
    fn correlated_samples_share_one_random_number() {
        for policy in [
            TwoDGridPolicy::Correlated(LIN),
            TwoDGridPolicy::UnitBaseCorrelated(LIN),
        ] {
            let t = two_uniforms(policy);
            let y = t
                .sample_secondary_conditional_with_random_number(0.5, 0.5, LIMIT)
                .unwrap();
            assert!(close(y, 1.25, 1e-15));
            let mut rng = ReplayRng::new(vec![0.5]);
            let s = t
                .sample_secondary_conditional_and_record_bin_indices(0.5, &mut rng, LIMIT)
                .unwrap();
            assert!(close(s.value, 1.25, 1e-15));
            assert_eq!(s.raw, s.value);
            assert_eq!((s.primary_bin_index, s.secondary_bin_index), (0, 0));
            assert_eq!(rng.draws(), 1);
        }
    }

    #[test]
    fn subrange_sampling() {
        let t = two_uniforms(TwoDGridPolicy::UnitBase(LIN));
        let y = t
            .sample_secondary_conditional_with_random_number_in_subrange(0.5, 0.25, 1.25, LIMIT)
            .unwrap();
        assert!(close(y, 0.875, 1e-12));
        assert_eq!(
            t.sample_secondary_conditional_with_random_number_in_subrange(0.5, 0.25, 0.2, LIMIT),
            Err(DomainError::InvalidSubrange {
                max: 0.2,
                lower: 0.5,
            })
        );

        let t = two_uniforms(TwoDGridPolicy::Correlated(LIN));
        let y = t
            .sample_secondary_conditional_with_random_number_in_subrange(0.5, 0.5, 1.25, LIMIT)
            .unwrap();
        assert!(close(y, 0.875, 1e-12));

        let mut rng = ReplayRng::new(vec![0.5]);
        let y = t
            .sample_secondary_conditional_in_subrange(1.0, &mut rng, 2.0, LIMIT)
            .unwrap();
        assert_eq!(y, 1.5);
    }

    #[test]
    fn partially_tabular_samples_non_tabular_secondaries() {
        let t = exponential_table();
        let mut rng = ReplayRng::new(vec![0.0]);
        let y = t.sample_secondary_conditional(0.5, &mut rng, LIMIT).unwrap();
        assert!(close(y, 0.6, 1e-15));
    }
}
