//! Grid policies and primary-limit handling.

use crate::interp::TwoDInterpPolicy;
use std::fmt;

/// How a primary value outside the tabulated grid is treated.
///
/// The same mode governs evaluation, sampling and bound queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PrimaryLimitMode {
    /// Values outside `[min, max]` are a domain error.
    #[default]
    Limit,
    /// Values below the grid use the first boundary distribution, values
    /// above it the last.
    Extend,
}

/// How the secondary distribution at a primary value between two grid
/// boundaries is constructed.
///
/// # Examples
///
/// ```
/// use phasespace_bivariate::{TwoDGridPolicy, TwoDInterpPolicy};
///
/// let p = TwoDGridPolicy::UnitBase(TwoDInterpPolicy::LIN_LIN_LOG);
/// assert_eq!(p.to_string(), "Unit-base LinLinLog");
/// assert!(!p.is_correlated());
/// assert!(TwoDGridPolicy::Correlated(TwoDInterpPolicy::LIN_LIN_LIN).is_correlated());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TwoDGridPolicy {
    /// Use the lower boundary's distribution over the whole bin.
    Histogram,
    /// Interpolate values at the same secondary coordinate; sample one
    /// boundary stochastically and keep the raw sample.
    Direct(TwoDInterpPolicy),
    /// Interpolate on a unit base that preserves the interpolated secondary
    /// limits; sample one boundary stochastically and rescale.
    UnitBase(TwoDInterpPolicy),
    /// Sample both boundaries with the same random number and interpolate
    /// the samples.
    Correlated(TwoDInterpPolicy),
    /// Sample both boundaries with the same random number and interpolate
    /// their unit-base coordinates.
    UnitBaseCorrelated(TwoDInterpPolicy),
}

impl TwoDGridPolicy {
    /// The interpolation scales, or `None` for the histogram policy.
    pub fn interp(self) -> Option<TwoDInterpPolicy> {
        match self {
            Self::Histogram => None,
            Self::Direct(p) | Self::UnitBase(p) | Self::Correlated(p) | Self::UnitBaseCorrelated(p) => {
                Some(p)
            }
        }
    }

    /// Whether sampling needs caller-invertible secondary distributions.
    pub fn is_correlated(self) -> bool {
        matches!(self, Self::Correlated(_) | Self::UnitBaseCorrelated(_))
    }

    /// Whether the secondary limits inside a bin are interpolated rather
    /// than taken from the boundaries.
    pub fn is_unit_base(self) -> bool {
        matches!(
            self,
            Self::UnitBase(_) | Self::Correlated(_) | Self::UnitBaseCorrelated(_)
        )
    }
}

impl fmt::Display for TwoDGridPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Histogram => f.write_str("Histogram"),
            Self::Direct(p) => write!(f, "Direct {p}"),
            Self::UnitBase(p) => write!(f, "Unit-base {p}"),
            Self::Correlated(p) => write!(f, "Correlated {p}"),
            Self::UnitBaseCorrelated(p) => write!(f, "Unit-base correlated {p}"),
        }
    }
}
