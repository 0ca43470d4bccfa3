//! Tabulated two-dimensional distributions for the phasespace sampling
//! engine.
//!
//! A [`TwoDDistribution`] holds a non-decreasing primary grid with one
//! secondary distribution per grid point. Given a primary value it locates
//! the bracketing grid points and, according to its [`TwoDGridPolicy`],
//! evaluates or samples the secondary variable:
//!
//! - on a grid point the point's own distribution is used unchanged;
//! - inside a bin the boundary distributions are combined (interpolated,
//!   unit-base rescaled or sampled with a shared random number) on the
//!   scales given by a [`TwoDInterpPolicy`].
//!
//! Outside the grid every call follows its [`PrimaryLimitMode`]: a
//! [`DomainError`](phasespace_core::DomainError) in limit mode, the nearest
//! boundary distribution in extend mode.
//!
//! Tables come in two flavours. [`PartiallyTabularTwoDDistribution`] accepts
//! any secondary distribution; [`FullyTabularTwoDDistribution`] requires
//! exact CDF inversion and adds the CDF, bin-index, caller-random-number
//! and subrange operations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod bin;
pub mod distribution;
pub mod interp;
pub mod policy;
pub mod sample;

pub use distribution::{
    FullyTabularTwoDDistribution, PartiallyTabularTwoDDistribution, SecondaryDistribution,
    TwoDDistribution,
};
pub use interp::{InterpAxis, TwoDInterpPolicy};
pub use policy::{PrimaryLimitMode, TwoDGridPolicy};
pub use sample::BinSample;

#[cfg(test)]
pub(crate) mod fixtures;
