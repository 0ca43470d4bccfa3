//! Full nine-dimension particle distributions.
//!
//! [`ParticleDistributionBuilder`] collects one node per dimension and fills
//! in defaults for the rest; [`StandardParticleDistribution`] owns the
//! resulting [`DimensionTree`] and samples whole phase-space points from it.

use indexmap::IndexMap;
use phasespace_core::{
    ConfigurationError, DimensionCounterMap, DirectionalCoordinateConversion,
    DirectionalCoordinateSystem, DomainError, PhaseSpaceDimension, PhaseSpacePoint,
    RandomNumberGenerator, SpatialCoordinateConversion, SpatialCoordinateSystem,
};
use phasespace_dimension::{
    DimensionTree, IndependentDistribution, NodeRef, PhaseSpaceDimensionDistribution,
};
use phasespace_univariate::{Delta, Uniform, UnivariateDistribution, UnivariateDistributionType};
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

type SharedNode = Arc<dyn PhaseSpaceDimensionDistribution>;

// ── SourceParticle ─────────────────────────────────────────────────

/// A sampled particle's starting state in global Cartesian coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceParticle {
    /// Position.
    pub position: [f64; 3],
    /// Unit direction.
    pub direction: [f64; 3],
    /// Energy.
    pub energy: f64,
    /// Time.
    pub time: f64,
    /// Statistical weight: the weight coordinate times every coordinate
    /// weight.
    pub weight: f64,
}

impl SourceParticle {
    /// Read a particle off a sampled point.
    pub fn from_point(point: &PhaseSpacePoint) -> Self {
        Self {
            position: point.spatial_cartesian(),
            direction: point.directional_cartesian(),
            energy: point.coordinate(PhaseSpaceDimension::Energy),
            time: point.coordinate(PhaseSpaceDimension::Time),
            weight: point.weight_of_coordinates(),
        }
    }
}

// ── Builder ────────────────────────────────────────────────────────

/// Assembles a [`StandardParticleDistribution`].
///
/// Setting a node for a dimension replaces any earlier one. Dimensions left
/// unset at [`build`](Self::build) get a default:
///
/// | Dimension | Default |
/// |---|---|
/// | spatial | `Delta(0)` each |
/// | directional, Cartesian system | `Uniform(-1, 1)` each |
/// | directional, spherical system | `Delta(1)`, `Uniform(0, 2pi)`, `Uniform(-1, 1)` |
/// | energy | `Delta(1)` |
/// | time | `Delta(0)` |
/// | weight | `Delta(1)` |
pub struct ParticleDistributionBuilder {
    name: String,
    spatial: SpatialCoordinateConversion,
    directional: DirectionalCoordinateConversion,
    nodes: IndexMap<PhaseSpaceDimension, SharedNode>,
}

impl fmt::Debug for ParticleDistributionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleDistributionBuilder")
            .field("name", &self.name)
            .field("spatial", &self.spatial.system())
            .field("directional", &self.directional.system())
            .field("dimensions", &self.nodes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ParticleDistributionBuilder {
    /// A builder using global Cartesian positions and spherical directions.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_coordinate_systems(
            name,
            SpatialCoordinateConversion::basic_cartesian(),
            DirectionalCoordinateConversion::basic(DirectionalCoordinateSystem::Spherical),
        )
    }

    /// A builder using the given coordinate conversions.
    pub fn with_coordinate_systems(
        name: impl Into<String>,
        spatial: SpatialCoordinateConversion,
        directional: DirectionalCoordinateConversion,
    ) -> Self {
        Self {
            name: name.into(),
            spatial,
            directional,
            nodes: IndexMap::new(),
        }
    }

    /// Set the node for the node's own dimension.
    pub fn set_dimension_distribution<N: PhaseSpaceDimensionDistribution>(
        &mut self,
        node: N,
    ) -> &mut Self {
        self.set_shared_dimension_distribution(Arc::new(node))
    }

    /// Set an already shared node for the node's own dimension.
    pub fn set_shared_dimension_distribution(&mut self, node: SharedNode) -> &mut Self {
        self.nodes.insert(node.dimension(), node);
        self
    }

    /// Sample every particle at `energy`.
    pub fn set_energy(&mut self, energy: f64) -> Result<&mut Self, ConfigurationError> {
        self.set_delta(PhaseSpaceDimension::Energy, energy)?;
        Ok(self)
    }

    /// Sample every particle at `time`.
    pub fn set_time(&mut self, time: f64) -> Result<&mut Self, ConfigurationError> {
        self.set_delta(PhaseSpaceDimension::Time, time)?;
        Ok(self)
    }

    /// Start every particle at a global Cartesian `position`.
    pub fn set_position(
        &mut self,
        position: [f64; 3],
    ) -> Result<&mut Self, ConfigurationError> {
        let local = self.spatial.from_cartesian(position);
        for (dimension, value) in PhaseSpaceDimension::SPATIAL.into_iter().zip(local) {
            self.set_delta(dimension, value)?;
        }
        Ok(self)
    }

    /// Start every particle along a global Cartesian `direction`.
    ///
    /// The direction is normalised first; a zero or non-finite vector is a
    /// [`ConfigurationError::InvalidCoordinateSystem`].
    pub fn set_direction(
        &mut self,
        direction: [f64; 3],
    ) -> Result<&mut Self, ConfigurationError> {
        let norm = direction.iter().map(|c| c * c).sum::<f64>().sqrt();
        if !(norm.is_finite() && norm > 0.0) {
            return Err(ConfigurationError::InvalidCoordinateSystem {
                reason: format!("direction {direction:?} cannot be normalised"),
            });
        }
        let unit = direction.map(|c| c / norm);
        let local = self.directional.from_cartesian(unit);
        for (dimension, value) in PhaseSpaceDimension::DIRECTIONAL.into_iter().zip(local) {
            self.set_delta(dimension, value)?;
        }
        Ok(self)
    }

    /// Forget every node set so far.
    pub fn reset(&mut self) -> &mut Self {
        self.nodes.clear();
        self
    }

    fn set_delta(
        &mut self,
        dimension: PhaseSpaceDimension,
        location: f64,
    ) -> Result<(), ConfigurationError> {
        let node = IndependentDistribution::new(dimension, Arc::new(Delta::at(location)?));
        self.set_dimension_distribution(node);
        Ok(())
    }

    fn default_node(
        &self,
        dimension: PhaseSpaceDimension,
    ) -> Result<SharedNode, ConfigurationError> {
        use PhaseSpaceDimension::*;

        let distribution: Arc<dyn UnivariateDistribution> = match dimension {
            PrimarySpatial | SecondarySpatial | TertiarySpatial | Time => Arc::new(Delta::at(0.0)?),
            Energy | Weight => Arc::new(Delta::at(1.0)?),
            PrimaryDirectional | SecondaryDirectional | TertiaryDirectional => {
                match (self.directional.system(), dimension) {
                    (DirectionalCoordinateSystem::Cartesian, _) => {
                        Arc::new(Uniform::new(-1.0, 1.0, 1.0)?)
                    }
                    (DirectionalCoordinateSystem::Spherical, PrimaryDirectional) => {
                        Arc::new(Delta::at(1.0)?)
                    }
                    (DirectionalCoordinateSystem::Spherical, SecondaryDirectional) => {
                        Arc::new(Uniform::new(0.0, 2.0 * PI, 1.0)?)
                    }
                    (DirectionalCoordinateSystem::Spherical, _) => {
                        Arc::new(Uniform::new(-1.0, 1.0, 1.0)?)
                    }
                }
            }
        };
        Ok(Arc::new(IndependentDistribution::new(dimension, distribution)))
    }

    /// Fill in defaults, wire every dependent node below the node of its
    /// parent dimension, and validate the tree.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::CyclicDependency`] if dependent nodes form a
    /// loop. Every dimension has a node once defaults are filled in, so no
    /// node can be orphaned.
    pub fn build(&self) -> Result<StandardParticleDistribution, ConfigurationError> {
        let mut nodes = Vec::with_capacity(PhaseSpaceDimension::COUNT);
        for dimension in PhaseSpaceDimension::ALL {
            let node = match self.nodes.get(&dimension) {
                Some(node) => Arc::clone(node),
                None => self.default_node(dimension)?,
            };
            nodes.push(node);
        }

        let mut builder = DimensionTree::builder();
        for node in &nodes {
            builder.add_shared(Arc::clone(node));
        }
        builder.construct_dependency_tree()?;
        let tree = builder.build()?;

        Ok(StandardParticleDistribution {
            name: self.name.clone(),
            spatial: self.spatial.clone(),
            directional: self.directional.clone(),
            nodes,
            tree,
        })
    }
}

// ── StandardParticleDistribution ───────────────────────────────────

/// A complete, validated phase-space distribution.
///
/// Immutable after [`ParticleDistributionBuilder::build`]; share it across
/// sampling threads behind an `Arc`.
pub struct StandardParticleDistribution {
    name: String,
    spatial: SpatialCoordinateConversion,
    directional: DirectionalCoordinateConversion,
    /// One node per dimension, indexed by [`PhaseSpaceDimension::index`].
    nodes: Vec<SharedNode>,
    tree: DimensionTree,
}

// Compile-time assertion: distributions are shared across sampling threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<StandardParticleDistribution>();
};

impl fmt::Debug for StandardParticleDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardParticleDistribution")
            .field("name", &self.name)
            .field("spatial", &self.spatial.system())
            .field("directional", &self.directional.system())
            .field("tree", &self.tree)
            .finish()
    }
}

impl StandardParticleDistribution {
    /// Start assembling a distribution called `name`.
    pub fn builder(name: impl Into<String>) -> ParticleDistributionBuilder {
        ParticleDistributionBuilder::new(name)
    }

    /// The distribution's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The spatial coordinate conversion every point is created with.
    pub fn spatial_conversion(&self) -> &SpatialCoordinateConversion {
        &self.spatial
    }

    /// The directional coordinate conversion every point is created with.
    pub fn directional_conversion(&self) -> &DirectionalCoordinateConversion {
        &self.directional
    }

    /// The dimension tree.
    pub fn tree(&self) -> &DimensionTree {
        &self.tree
    }

    fn node(&self, dimension: PhaseSpaceDimension) -> &dyn PhaseSpaceDimensionDistribution {
        self.nodes[dimension.index()].as_ref()
    }

    /// Type name of the distribution sampling `dimension`.
    pub fn dimension_type_name(&self, dimension: PhaseSpaceDimension) -> String {
        self.node(dimension).distribution_type_name()
    }

    /// Whether the spatial distributions describe particles spread
    /// uniformly through a region.
    ///
    /// The radial check for cylindrical and spherical systems only asks for
    /// a power-law form, not the exact exponent.
    pub fn is_spatially_uniform(&self) -> bool {
        use PhaseSpaceDimension::*;

        let primary = self.node(PrimarySpatial);
        let primary_uniform = match self.spatial.system() {
            SpatialCoordinateSystem::Cartesian => primary.is_uniform(),
            SpatialCoordinateSystem::Cylindrical | SpatialCoordinateSystem::Spherical => {
                primary.has_form(UnivariateDistributionType::Power)
            }
        };
        primary_uniform
            && self.node(SecondarySpatial).is_uniform()
            && self.node(TertiarySpatial).is_uniform()
    }

    /// Whether the directional distributions are isotropic.
    ///
    /// Only spherical directional systems can be.
    pub fn is_directionally_uniform(&self) -> bool {
        self.directional.system() == DirectionalCoordinateSystem::Spherical
            && self.node(PhaseSpaceDimension::SecondaryDirectional).is_uniform()
            && self.node(PhaseSpaceDimension::TertiaryDirectional).is_uniform()
    }

    /// A point with default coordinates in this distribution's systems.
    pub fn initialize_point(&self) -> PhaseSpacePoint {
        PhaseSpacePoint::new(self.spatial.clone(), self.directional.clone())
    }

    /// The point describing `particle` in this distribution's systems.
    pub fn point_for(&self, particle: &SourceParticle) -> PhaseSpacePoint {
        let mut point = self.initialize_point();
        point.set_spatial_from_cartesian(particle.position);
        point.set_directional_from_cartesian(particle.direction);
        point.set_coordinate(PhaseSpaceDimension::Energy, particle.energy);
        point.set_coordinate(PhaseSpaceDimension::Time, particle.time);
        point.set_coordinate(PhaseSpaceDimension::Weight, particle.weight);
        point
    }

    /// Set a zero counter for every dimension.
    pub fn initialize_dimension_counters(&self, trials: &mut DimensionCounterMap) {
        for dimension in PhaseSpaceDimension::ALL {
            trials.insert(dimension, 0);
        }
    }

    /// Joint density at `point`: the product of every dimension's
    /// conditional density except the weight dimension's.
    ///
    /// Parents are evaluated before their children and a zero factor ends
    /// the product, so a conditional whose parent coordinate lies outside
    /// its support is never asked.
    pub fn evaluate(&self, point: &PhaseSpacePoint) -> Result<f64, DomainError> {
        let mut value = 1.0;
        for root in self.tree.roots() {
            value *= evaluate_subtree(root, point)?;
            if value == 0.0 {
                break;
            }
        }
        Ok(value)
    }

    /// Joint density at the point describing `particle`.
    pub fn evaluate_particle(&self, particle: &SourceParticle) -> Result<f64, DomainError> {
        self.evaluate(&self.point_for(particle))
    }

    /// Sample a fresh point.
    pub fn sample(
        &self,
        rng: &mut dyn RandomNumberGenerator,
    ) -> Result<PhaseSpacePoint, DomainError> {
        let mut point = self.initialize_point();
        for root in self.tree.roots() {
            root.sample_with_cascade(&mut point, rng)?;
        }
        Ok(point)
    }

    /// Sample a fresh point, adding each dimension's trials to `trials`.
    pub fn sample_and_record_trials(
        &self,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut DimensionCounterMap,
    ) -> Result<PhaseSpacePoint, DomainError> {
        let mut point = self.initialize_point();
        for root in self.tree.roots() {
            root.sample_and_record_trials_with_cascade(&mut point, rng, trials)?;
        }
        Ok(point)
    }

    /// Sample a fresh point with `dimension` forced to `value` and weighted
    /// accordingly.
    pub fn sample_with_dimension_value(
        &self,
        rng: &mut dyn RandomNumberGenerator,
        dimension: PhaseSpaceDimension,
        value: f64,
    ) -> Result<PhaseSpacePoint, DomainError> {
        let mut point = self.initialize_point();
        for root in self.tree.roots() {
            root.sample_with_cascade_using_dimension_value(&mut point, rng, dimension, value)?;
        }
        Ok(point)
    }

    /// As [`sample_with_dimension_value`](Self::sample_with_dimension_value),
    /// recording trials for every drawn dimension.
    pub fn sample_and_record_trials_with_dimension_value(
        &self,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut DimensionCounterMap,
        dimension: PhaseSpaceDimension,
        value: f64,
    ) -> Result<PhaseSpacePoint, DomainError> {
        let mut point = self.initialize_point();
        for root in self.tree.roots() {
            root.sample_and_record_trials_with_cascade_using_dimension_value(
                &mut point, rng, trials, dimension, value,
            )?;
        }
        Ok(point)
    }
}

fn evaluate_subtree(node: NodeRef<'_>, point: &PhaseSpacePoint) -> Result<f64, DomainError> {
    let mut value = if node.dimension() == PhaseSpaceDimension::Weight {
        1.0
    } else {
        node.evaluate_without_cascade(point)?
    };
    for child in node.children() {
        if value == 0.0 {
            break;
        }
        value *= evaluate_subtree(child, point)?;
    }
    Ok(value)
}
