//! Axis scales and one-dimensional interpolation between grid boundaries.

use std::fmt;

/// Scale on which one axis is interpolated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterpAxis {
    /// Interpolate the raw value.
    Lin,
    /// Interpolate the natural logarithm of the value.
    Log,
}

impl InterpAxis {
    /// Map a value onto the interpolation scale.
    pub fn process(self, v: f64) -> f64 {
        match self {
            Self::Lin => v,
            Self::Log => v.ln(),
        }
    }

    /// Inverse of [`process`](Self::process).
    pub fn recover(self, v: f64) -> f64 {
        match self {
            Self::Lin => v,
            Self::Log => v.exp(),
        }
    }

    /// Derivative of [`process`](Self::process) at `v`.
    pub fn derivative(self, v: f64) -> f64 {
        match self {
            Self::Lin => 1.0,
            Self::Log => 1.0 / v,
        }
    }

    /// Whether `v` lies on the scale's domain.
    pub fn accepts(self, v: f64) -> bool {
        match self {
            Self::Lin => true,
            Self::Log => v > 0.0,
        }
    }

    /// This axis if every value lies on its domain, otherwise [`Lin`](Self::Lin).
    pub fn or_lin(self, values: &[f64]) -> Self {
        if values.iter().all(|v| self.accepts(*v)) {
            self
        } else {
            Self::Lin
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Lin => "Lin",
            Self::Log => "Log",
        }
    }
}

/// Interpolation scales of a two-dimensional table.
///
/// Named dependent-secondary-primary: `LinLogLin` interpolates the
/// dependent value linearly, the secondary variable logarithmically and
/// the primary variable linearly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TwoDInterpPolicy {
    /// Scale of the dependent (density) value.
    pub dependent: InterpAxis,
    /// Scale of the secondary independent variable.
    pub secondary: InterpAxis,
    /// Scale of the primary independent variable.
    pub primary: InterpAxis,
}

impl TwoDInterpPolicy {
    /// Linear on every axis.
    pub const LIN_LIN_LIN: Self = Self::new(InterpAxis::Lin, InterpAxis::Lin, InterpAxis::Lin);
    /// Logarithmic primary axis.
    pub const LIN_LIN_LOG: Self = Self::new(InterpAxis::Lin, InterpAxis::Lin, InterpAxis::Log);
    /// Logarithmic secondary axis.
    pub const LIN_LOG_LIN: Self = Self::new(InterpAxis::Lin, InterpAxis::Log, InterpAxis::Lin);
    /// Logarithmic secondary and primary axes.
    pub const LIN_LOG_LOG: Self = Self::new(InterpAxis::Lin, InterpAxis::Log, InterpAxis::Log);
    /// Logarithmic dependent axis.
    pub const LOG_LIN_LIN: Self = Self::new(InterpAxis::Log, InterpAxis::Lin, InterpAxis::Lin);
    /// Logarithmic dependent and primary axes.
    pub const LOG_LIN_LOG: Self = Self::new(InterpAxis::Log, InterpAxis::Lin, InterpAxis::Log);
    /// Logarithmic dependent and secondary axes.
    pub const LOG_LOG_LIN: Self = Self::new(InterpAxis::Log, InterpAxis::Log, InterpAxis::Lin);
    /// Logarithmic on every axis.
    pub const LOG_LOG_LOG: Self = Self::new(InterpAxis::Log, InterpAxis::Log, InterpAxis::Log);

    /// Build a policy from its three axis scales.
    pub const fn new(dependent: InterpAxis, secondary: InterpAxis, primary: InterpAxis) -> Self {
        Self {
            dependent,
            secondary,
            primary,
        }
    }

    /// Interpolate a dependent value across the primary axis.
    pub fn interpolate_dependent(self, x0: f64, x1: f64, x: f64, z0: f64, z1: f64) -> f64 {
        interpolate(self.primary, self.dependent, x0, x1, x, z0, z1)
    }

    /// Interpolate a secondary value (a limit or a sample) across the
    /// primary axis.
    pub fn interpolate_secondary(self, x0: f64, x1: f64, x: f64, y0: f64, y1: f64) -> f64 {
        interpolate(self.primary, self.secondary, x0, x1, x, y0, y1)
    }

    /// Interpolate a value that is linear in the processed primary
    /// variable, such as a unit-base grid length.
    pub fn interpolate_linear(self, x0: f64, x1: f64, x: f64, v0: f64, v1: f64) -> f64 {
        interpolate(self.primary, InterpAxis::Lin, x0, x1, x, v0, v1)
    }

    /// Fraction of the way from `x0` to `x1` on the primary scale.
    pub fn primary_fraction(self, x0: f64, x1: f64, x: f64) -> f64 {
        fraction(self.primary.or_lin(&[x0, x1, x]), x0, x1, x)
    }

    /// Policy name, e.g. `"LinLogLin"`.
    pub fn name(self) -> String {
        format!(
            "{}{}{}",
            self.dependent.name(),
            self.secondary.name(),
            self.primary.name()
        )
    }
}

impl Default for TwoDInterpPolicy {
    fn default() -> Self {
        Self::LIN_LIN_LIN
    }
}

impl fmt::Display for TwoDInterpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn fraction(axis: InterpAxis, x0: f64, x1: f64, x: f64) -> f64 {
    let p0 = axis.process(x0);
    let span = axis.process(x1) - p0;
    if span == 0.0 {
        0.0
    } else {
        (axis.process(x) - p0) / span
    }
}

/// Interpolate between `(x0, y0)` and `(x1, y1)` at `x`.
///
/// Either axis falls back to linear when a value lies off its logarithmic
/// domain. Equal end values are returned unchanged, which keeps infinite
/// limits intact.
pub fn interpolate(
    indep: InterpAxis,
    dep: InterpAxis,
    x0: f64,
    x1: f64,
    x: f64,
    y0: f64,
    y1: f64,
) -> f64 {
    if y0 == y1 {
        return y0;
    }
    let t = fraction(indep.or_lin(&[x0, x1, x]), x0, x1, x);
    let dep = dep.or_lin(&[y0, y1]);
    let p0 = dep.process(y0);
    dep.recover(p0 + t * (dep.process(y1) - p0))
}
