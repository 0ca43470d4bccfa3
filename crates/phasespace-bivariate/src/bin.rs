//! Interpolation inside one primary bin.

use crate::distribution::SecondaryDistribution;
use crate::interp::{interpolate, InterpAxis, TwoDInterpPolicy};
use crate::policy::TwoDGridPolicy;
use phasespace_univariate::TabularUnivariateDistribution;

/// Bisection tolerance on the random number for exact correlated CDFs.
const CDF_TOLERANCE: f64 = 1e-12;

/// Bisection iteration cap for exact correlated CDFs.
const CDF_MAX_ITERATIONS: u32 = 500;

/// A secondary range mapped onto `[0, 1]` on the secondary scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct UnitBase {
    axis: InterpAxis,
    /// Processed lower limit.
    lower: f64,
    /// Processed length.
    pub(crate) length: f64,
}

impl UnitBase {
    pub(crate) fn new(axis: InterpAxis, lower: f64, upper: f64) -> Self {
        let lower = axis.process(lower);
        Self {
            axis,
            lower,
            length: axis.process(upper) - lower,
        }
    }

    pub(crate) fn eta(&self, y: f64) -> f64 {
        if self.length == 0.0 || !self.length.is_finite() {
            0.0
        } else {
            (self.axis.process(y) - self.lower) / self.length
        }
    }

    pub(crate) fn value(&self, eta: f64) -> f64 {
        self.axis.recover(self.lower + eta * self.length)
    }
}

/// The two boundary distributions bracketing a primary value strictly
/// inside a bin.
pub(crate) struct Bin<'a, D: ?Sized> {
    policy: TwoDGridPolicy,
    interp: TwoDInterpPolicy,
    /// Secondary scale valid on both boundaries.
    axis: InterpAxis,
    x0: f64,
    x1: f64,
    x: f64,
    /// Interpolation fraction on the primary scale.
    pub(crate) fraction: f64,
    pub(crate) lower: &'a D,
    pub(crate) upper: &'a D,
}

impl<'a, D: SecondaryDistribution + ?Sized> Bin<'a, D> {
    pub(crate) fn new(
        policy: TwoDGridPolicy,
        (x0, x1): (f64, f64),
        x: f64,
        lower: &'a D,
        upper: &'a D,
    ) -> Self {
        let interp = policy.interp().unwrap_or_default();
        let axis = interp
            .secondary
            .or_lin(&[lower.lower_bound(), upper.lower_bound()]);
        Self {
            policy,
            interp,
            axis,
            x0,
            x1,
            x,
            fraction: interp.primary_fraction(x0, x1, x),
            lower,
            upper,
        }
    }

    /// Drop to a linear secondary scale if `value` is off the current one.
    pub(crate) fn accepting(mut self, value: f64) -> Self {
        self.axis = self.axis.or_lin(&[value]);
        self
    }

    fn across(&self, dep: InterpAxis, v0: f64, v1: f64) -> f64 {
        interpolate(self.interp.primary, dep, self.x0, self.x1, self.x, v0, v1)
    }

    pub(crate) fn grid(&self, d: &D) -> UnitBase {
        UnitBase::new(self.axis, d.lower_bound(), d.upper_bound())
    }

    /// Smallest lower and largest upper boundary limit.
    pub(crate) fn envelope(&self) -> (f64, f64) {
        (
            self.lower.lower_bound().min(self.upper.lower_bound()),
            self.lower.upper_bound().max(self.upper.upper_bound()),
        )
    }

    /// Secondary limits interpolated across the bin.
    pub(crate) fn limits(&self) -> (f64, f64) {
        (
            self.across(self.axis, self.lower.lower_bound(), self.upper.lower_bound()),
            self.across(self.axis, self.lower.upper_bound(), self.upper.upper_bound()),
        )
    }

    /// Unit base spanning the interpolated limits.
    pub(crate) fn intermediate(&self) -> UnitBase {
        let (min, _) = self.limits();
        UnitBase {
            axis: self.axis,
            lower: self.axis.process(min),
            length: self.across(
                InterpAxis::Lin,
                self.grid(self.lower).length,
                self.grid(self.upper).length,
            ),
        }
    }

    /// Unit base spanning caller-supplied limits.
    pub(crate) fn supplied(&self, min: f64, max: f64) -> UnitBase {
        UnitBase::new(self.axis, min, max)
    }

    /// Interpolate boundary values taken at the same secondary coordinate.
    pub(crate) fn direct(&self, y: f64, eval: impl Fn(&D, f64) -> f64) -> f64 {
        let z0 = eval(self.lower, y);
        let z1 = eval(self.upper, y);
        if z0 > 0.0 && z1 > 0.0 {
            self.across(self.interp.dependent, z0, z1)
        } else {
            interpolate(InterpAxis::Lin, InterpAxis::Lin, self.x0, self.x1, self.x, z0, z1)
        }
    }

    /// Coordinates on each boundary at the same unit-base position as `y`
    /// on `intermediate`.
    fn mapped(&self, y: f64, intermediate: &UnitBase) -> (f64, f64) {
        let eta = intermediate.eta(y).clamp(0.0, 1.0);
        (
            self.grid(self.lower)
                .value(eta)
                .min(self.lower.upper_bound()),
            self.grid(self.upper)
                .value(eta)
                .min(self.upper.upper_bound()),
        )
    }

    /// Unit-base interpolation of a density-like quantity.
    pub(crate) fn unit_base(
        &self,
        y: f64,
        intermediate: &UnitBase,
        (min, max): (f64, f64),
        eval: impl Fn(&D, f64) -> f64,
    ) -> f64 {
        if y.is_nan() || y < min || y > max {
            return 0.0;
        }
        let (y0, y1) = self.mapped(y, intermediate);
        let z0 = eval(self.lower, y0);
        let z1 = eval(self.upper, y1);
        if intermediate.length == 0.0 || !intermediate.length.is_finite() {
            return self.across(self.interp.dependent, z0, z1);
        }
        let scaled0 = z0 * self.grid(self.lower).length;
        let scaled1 = z1 * self.grid(self.upper).length;
        self.across(self.interp.dependent, scaled0, scaled1) / intermediate.length
    }

    /// Unit-base interpolation of the CDF.
    pub(crate) fn unit_base_cdf(
        &self,
        y: f64,
        intermediate: &UnitBase,
        (min, max): (f64, f64),
        cdf: impl Fn(&D, f64) -> f64,
    ) -> f64 {
        if y.is_nan() || y < min {
            return 0.0;
        }
        if y > max {
            return 1.0;
        }
        let (y0, y1) = self.mapped(y, intermediate);
        let c0 = cdf(self.lower, y0);
        let c1 = cdf(self.upper, y1);
        if c0 == c1 {
            c0
        } else {
            self.across(self.interp.dependent, c0, c1)
        }
    }

    /// Carry a raw sample from boundary `d` onto the intermediate grid.
    pub(crate) fn rescale(&self, d: &D, raw: f64) -> f64 {
        self.intermediate().value(self.grid(d).eta(raw))
    }

    /// Cap on boundary `d` equivalent to `max` on the intermediate grid.
    pub(crate) fn subrange_cap(&self, d: &D, max: f64) -> f64 {
        let (_, upper) = self.limits();
        if max < upper {
            self.grid(d).value(self.intermediate().eta(max))
        } else {
            d.upper_bound()
        }
    }

    /// Combine two boundary samples drawn with the same random number.
    pub(crate) fn correlate(&self, y0: f64, y1: f64) -> f64 {
        let b = self.fraction;
        match self.policy {
            TwoDGridPolicy::UnitBaseCorrelated(_) => {
                let eta0 = self.grid(self.lower).eta(y0);
                let eta1 = self.grid(self.upper).eta(y1);
                self.intermediate().value((1.0 - b) * eta0 + b * eta1)
            }
            _ => {
                let axis = self.axis.or_lin(&[y0, y1]);
                axis.recover((1.0 - b) * axis.process(y0) + b * axis.process(y1))
            }
        }
    }

    /// Correlated sample at the random number `r`.
    pub(crate) fn correlated(
        &self,
        t0: &dyn TabularUnivariateDistribution,
        t1: &dyn TabularUnivariateDistribution,
        r: f64,
    ) -> f64 {
        self.correlate(
            t0.sample_with_random_number(r),
            t1.sample_with_random_number(r),
        )
    }

    /// CDF of the correlated distribution: the random number whose
    /// correlated sample is `y`.
    pub(crate) fn correlated_cdf(
        &self,
        t0: &dyn TabularUnivariateDistribution,
        t1: &dyn TabularUnivariateDistribution,
        y: f64,
    ) -> f64 {
        let (min, max) = self.limits();
        if y.is_nan() || y <= min {
            return 0.0;
        }
        if y >= max {
            return 1.0;
        }
        let (mut lo, mut hi) = (0.0f64, 1.0f64);
        for _ in 0..CDF_MAX_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.correlated(t0, t1, mid) < y {
                lo = mid;
            } else {
                hi = mid;
            }
            if hi - lo < CDF_TOLERANCE {
                break;
            }
        }
        0.5 * (lo + hi)
    }

    /// PDF of the correlated distribution by the chain rule through the
    /// shared random number.
    pub(crate) fn correlated_pdf(
        &self,
        t0: &dyn TabularUnivariateDistribution,
        t1: &dyn TabularUnivariateDistribution,
        y: f64,
    ) -> f64 {
        let (min, max) = self.limits();
        if y.is_nan() || y < min || y > max {
            return 0.0;
        }
        let xi = self.correlated_cdf(t0, t1, y);
        let y0 = t0.sample_with_random_number(xi);
        let y1 = t1.sample_with_random_number(xi);
        let f0 = t0.evaluate_pdf(y0);
        let f1 = t1.evaluate_pdf(y1);
        let b = self.fraction;
        let axis = self.axis;
        let slope = match self.policy {
            TwoDGridPolicy::UnitBaseCorrelated(_) => {
                let l0 = self.grid(self.lower).length;
                let l1 = self.grid(self.upper).length;
                self.intermediate().length
                    * ((1.0 - b) * axis.derivative(y0) / (f0 * l0)
                        + b * axis.derivative(y1) / (f1 * l1))
            }
            _ => (1.0 - b) * axis.derivative(y0) / f0 + b * axis.derivative(y1) / f1,
        };
        if slope.is_finite() && slope > 0.0 {
            axis.derivative(y) / slope
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_base_round_trips() {
        let g = UnitBase::new(InterpAxis::Lin, 2.0, 6.0);
        assert_eq!(g.eta(3.0), 0.25);
        assert_eq!(g.value(0.25), 3.0);
        let g = UnitBase::new(InterpAxis::Log, 1.0, 100.0);
        assert!((g.eta(10.0) - 0.5).abs() < 1e-15);
        assert!((g.value(0.5) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_unit_base_maps_to_zero() {
        let g = UnitBase::new(InterpAxis::Lin, 1.0, 1.0);
        assert_eq!(g.eta(1.0), 0.0);
        assert_eq!(g.value(0.7), 1.0);
    }
}
