//! One-dimensional distributions for the phasespace sampling engine.
//!
//! Every distribution implements [`UnivariateDistribution`]; those whose
//! CDF can be inverted exactly also implement
//! [`TabularUnivariateDistribution`], which the correlated two-dimensional
//! policies and importance sampling require.
//!
//! | Type | Tabular | Continuous |
//! |---|---|---|
//! | [`Uniform`] | yes | yes |
//! | [`Histogram`] | yes | yes |
//! | [`Exponential`] | no | yes |
//! | [`Delta`] | yes | no |
//! | [`Power`] | no | yes |
//! | [`Discrete`] | yes | no |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod delta;
pub mod discrete;
pub mod distribution;
pub mod exponential;
pub mod histogram;
pub mod power;
pub mod uniform;
mod validate;

#[cfg(test)]
pub(crate) mod compliance;

pub use delta::Delta;
pub use discrete::Discrete;
pub use distribution::{
    TabularUnivariateDistribution, UnivariateDistribution, UnivariateDistributionType,
};
pub use exponential::Exponential;
pub use histogram::Histogram;
pub use power::Power;
pub use uniform::Uniform;
