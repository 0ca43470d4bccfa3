//! Phasespace: particle source sampling for Monte Carlo transport.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all phasespace sub-crates. For most users, adding `phasespace` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use phasespace::prelude::*;
//! use std::sync::Arc;
//!
//! // Energy on U(1, 2); everything else keeps its default.
//! let mut builder = StandardParticleDistribution::builder("quick start");
//! builder.set_dimension_distribution(IndependentDistribution::new(
//!     PhaseSpaceDimension::Energy,
//!     Arc::new(Uniform::new(1.0, 2.0, 1.0).unwrap()),
//! ));
//! let distribution = Arc::new(builder.build().unwrap());
//!
//! let config = SourceConfig {
//!     histories: 100,
//!     seed: 42,
//!     ..SourceConfig::default()
//! };
//! let run = ParticleSource::new(distribution, config).unwrap().run().unwrap();
//! assert_eq!(run.histories.len(), 100);
//! assert!(run.histories.iter().all(|h| (1.0..=2.0).contains(&h.particle().energy)));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `phasespace-core` | Dimensions, points, coordinate systems, errors, random streams |
//! | [`univariate`] | `phasespace-univariate` | One-dimensional distributions |
//! | [`bivariate`] | `phasespace-bivariate` | Tabulated two-dimensional distributions and grid policies |
//! | [`dimension`] | `phasespace-dimension` | Dimension nodes and the dependency tree |
//! | [`source`] | `phasespace-source` | Particle distributions and the parallel source driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`phasespace-core`).
///
/// Contains [`types::PhaseSpaceDimension`], [`types::PhaseSpacePoint`],
/// the coordinate conversions, the error types, and the
/// [`types::RandomNumberGenerator`] trait.
pub use phasespace_core as types;

/// One-dimensional distributions (`phasespace-univariate`).
pub use phasespace_univariate as univariate;

/// Tabulated two-dimensional distributions (`phasespace-bivariate`).
///
/// Build tables with [`bivariate::FullyTabularTwoDDistribution`] or
/// [`bivariate::PartiallyTabularTwoDDistribution`].
pub use phasespace_bivariate as bivariate;

/// Dimension nodes and the dependency tree (`phasespace-dimension`).
pub use phasespace_dimension as dimension;

/// Particle distributions and the parallel source driver
/// (`phasespace-source`).
pub use phasespace_source as source;

/// Common imports for typical phasespace usage.
///
/// ```rust
/// use phasespace::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use phasespace_core::{
        DirectionalCoordinateConversion, DirectionalCoordinateSystem, PhaseSpaceDimension,
        PhaseSpacePoint, RandomNumberGenerator, SpatialCoordinateConversion,
        SpatialCoordinateSystem, StreamRng,
    };

    // Errors
    pub use phasespace_core::{ConfigurationError, DomainError, PhaseSpaceError};

    // Distributions
    pub use phasespace_bivariate::{
        FullyTabularTwoDDistribution, PartiallyTabularTwoDDistribution, PrimaryLimitMode,
        TwoDGridPolicy, TwoDInterpPolicy,
    };
    pub use phasespace_univariate::{
        Delta, Discrete, Exponential, Histogram, Power, TabularUnivariateDistribution, Uniform,
        UnivariateDistribution,
    };

    // Dimension tree
    pub use phasespace_dimension::{
        DependentDistribution, IndependentDistribution, PhaseSpaceDimensionDistribution,
    };

    // Source
    pub use phasespace_source::{
        ParticleDistributionBuilder, ParticleSource, SourceConfig, SourceParticle, SourceRun,
        StandardParticleDistribution,
    };
}
