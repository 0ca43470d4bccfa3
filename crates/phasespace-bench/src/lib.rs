//! Benchmark profiles for the phasespace sampling engine.
//!
//! Provides pre-built tables, distributions and run configurations shared
//! by the benches:
//!
//! - [`reference_table`]: a fully tabular energy-given-time table
//! - [`reference_distribution`]: a spherical volume source with
//!   time-dependent energy
//! - [`reference_config`]: a seeded run over a fixed history count

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use phasespace_bivariate::{FullyTabularTwoDDistribution, TwoDGridPolicy};
use phasespace_core::{
    ConfigurationError, DirectionalCoordinateConversion, DirectionalCoordinateSystem,
    PhaseSpaceDimension, SpatialCoordinateConversion, SpatialCoordinateSystem,
};
use phasespace_dimension::{DependentDistribution, IndependentDistribution};
use phasespace_source::{ParticleDistributionBuilder, SourceConfig, StandardParticleDistribution};
use phasespace_univariate::{Power, TabularUnivariateDistribution, Uniform};
use std::f64::consts::PI;
use std::sync::Arc;

/// Build a table with `bins` primary bins over `[1, bins + 1]`.
///
/// Grid point `x` carries `U(x, 2x + 1)`, so every secondary limit is
/// positive and every policy, logarithmic scales included, applies.
pub fn reference_table(
    bins: usize,
    policy: TwoDGridPolicy,
) -> Result<FullyTabularTwoDDistribution, ConfigurationError> {
    let grid: Vec<f64> = (0..=bins).map(|i| 1.0 + i as f64).collect();
    let secondary = grid
        .iter()
        .map(|&x| -> Result<Arc<dyn TabularUnivariateDistribution>, ConfigurationError> {
            Ok(Arc::new(Uniform::new(x, 2.0 * x + 1.0, 1.0)?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    FullyTabularTwoDDistribution::fully_tabular(grid, secondary, policy)
}

/// Build the reference source: uniform in a unit sphere, isotropic, time on
/// `U(1, bins + 1)` and energy conditioned on time by [`reference_table`].
pub fn reference_distribution(
    bins: usize,
    policy: TwoDGridPolicy,
) -> Result<StandardParticleDistribution, ConfigurationError> {
    let mut builder = ParticleDistributionBuilder::with_coordinate_systems(
        "reference",
        SpatialCoordinateConversion::basic(SpatialCoordinateSystem::Spherical),
        DirectionalCoordinateConversion::basic(DirectionalCoordinateSystem::Spherical),
    );
    builder
        .set_dimension_distribution(IndependentDistribution::new(
            PhaseSpaceDimension::PrimarySpatial,
            Arc::new(Power::new(2, 3.0, 0.0, 1.0)?),
        ))
        .set_dimension_distribution(IndependentDistribution::new(
            PhaseSpaceDimension::SecondarySpatial,
            Arc::new(Uniform::new(0.0, 2.0 * PI, 1.0)?),
        ))
        .set_dimension_distribution(IndependentDistribution::new(
            PhaseSpaceDimension::TertiarySpatial,
            Arc::new(Uniform::new(-1.0, 1.0, 1.0)?),
        ))
        .set_dimension_distribution(IndependentDistribution::new(
            PhaseSpaceDimension::Time,
            Arc::new(Uniform::new(1.0, 1.0 + bins as f64, 1.0)?),
        ))
        .set_dimension_distribution(DependentDistribution::new(
            PhaseSpaceDimension::Time,
            PhaseSpaceDimension::Energy,
            Arc::new(reference_table(bins, policy)?),
        )?);
    builder.build()
}

/// A seeded run over `histories` histories with automatic worker count.
pub fn reference_config(seed: u64, histories: u64) -> SourceConfig {
    SourceConfig {
        histories,
        seed,
        ..SourceConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasespace_bivariate::TwoDInterpPolicy;
    use phasespace_core::StreamRng;

    #[test]
    fn reference_table_spans_the_grid() {
        let table = reference_table(8, TwoDGridPolicy::Histogram).unwrap();
        assert_eq!(table.grid().len(), 9);
        assert_eq!(table.lower_bound_of_primary_indep_var(), 1.0);
        assert_eq!(table.upper_bound_of_primary_indep_var(), 9.0);
    }

    #[test]
    fn reference_distribution_samples_every_policy() {
        let policies = [
            TwoDGridPolicy::Histogram,
            TwoDGridPolicy::Direct(TwoDInterpPolicy::LIN_LIN_LIN),
            TwoDGridPolicy::UnitBase(TwoDInterpPolicy::LOG_LOG_LOG),
            TwoDGridPolicy::Correlated(TwoDInterpPolicy::LIN_LIN_LIN),
            TwoDGridPolicy::UnitBaseCorrelated(TwoDInterpPolicy::LIN_LOG_LIN),
        ];
        for policy in policies {
            let dist = reference_distribution(16, policy).unwrap();
            assert!(dist.is_spatially_uniform());
            assert!(dist.is_directionally_uniform());
            let mut rng = StreamRng::for_history(42, 0);
            for _ in 0..100 {
                let point = dist.sample(&mut rng).unwrap();
                let energy = point.coordinate(PhaseSpaceDimension::Energy);
                assert!((1.0..=35.0).contains(&energy), "{policy}: {energy}");
            }
        }
    }

    #[test]
    fn reference_config_validates() {
        let config = reference_config(42, 10_000);
        config.validate().unwrap();
        assert_eq!(config.seed, 42);
    }
}
