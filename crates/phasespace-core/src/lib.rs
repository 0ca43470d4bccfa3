//! Core types for the phasespace sampling engine.
//!
//! This is a leaf crate with no internal phasespace dependencies. It defines
//! the vocabulary shared by every other crate in the workspace:
//!
//! - [`PhaseSpaceDimension`]: the nine axes of a particle's starting state.
//! - [`PhaseSpacePoint`]: the per-history value/weight store.
//! - [`SpatialCoordinateConversion`] / [`DirectionalCoordinateConversion`]:
//!   local-to-global coordinate policies owned by a point.
//! - [`RandomNumberGenerator`]: the injectable uniform stream, with the
//!   seeded [`StreamRng`] and the deterministic [`ReplayRng`].
//! - [`ConfigurationError`] / [`DomainError`]: fatal and recoverable errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coordinate;
pub mod dimension;
pub mod error;
pub mod point;
pub mod rng;

pub use coordinate::{
    DirectionalCoordinateConversion, DirectionalCoordinateSystem, SpatialCoordinateConversion,
    SpatialCoordinateSystem,
};
pub use dimension::{DimensionCounterMap, PhaseSpaceDimension, PhaseSpaceDimensionClass};
pub use error::{ConfigurationError, DomainError, PhaseSpaceError};
pub use point::PhaseSpacePoint;
pub use rng::{RandomNumberGenerator, ReplayRng, StreamRng};
