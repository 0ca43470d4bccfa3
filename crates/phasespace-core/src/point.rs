//! The per-history [`PhaseSpacePoint`].

use crate::{DirectionalCoordinateConversion, PhaseSpaceDimension, SpatialCoordinateConversion};

/// A particle's starting state: one value and one weight per dimension.
///
/// Created for a single history, mutated as dimensions are sampled, then
/// discarded. Coordinate values default to 0 except the weight coordinate,
/// which defaults to 1. Every coordinate weight defaults to 1.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseSpacePoint {
    spatial: SpatialCoordinateConversion,
    directional: DirectionalCoordinateConversion,
    coordinates: [f64; PhaseSpaceDimension::COUNT],
    weights: [f64; PhaseSpaceDimension::COUNT],
}

impl PhaseSpacePoint {
    /// Create a point with default coordinates in the given systems.
    pub fn new(
        spatial: SpatialCoordinateConversion,
        directional: DirectionalCoordinateConversion,
    ) -> Self {
        let mut coordinates = [0.0; PhaseSpaceDimension::COUNT];
        coordinates[PhaseSpaceDimension::Weight.index()] = 1.0;
        Self {
            spatial,
            directional,
            coordinates,
            weights: [1.0; PhaseSpaceDimension::COUNT],
        }
    }

    /// The spatial coordinate-conversion policy.
    pub fn spatial_conversion(&self) -> &SpatialCoordinateConversion {
        &self.spatial
    }

    /// The directional coordinate-conversion policy.
    pub fn directional_conversion(&self) -> &DirectionalCoordinateConversion {
        &self.directional
    }

    /// Value of `dimension`.
    pub fn coordinate(&self, dimension: PhaseSpaceDimension) -> f64 {
        self.coordinates[dimension.index()]
    }

    /// Set the value of `dimension`.
    pub fn set_coordinate(&mut self, dimension: PhaseSpaceDimension, value: f64) {
        self.coordinates[dimension.index()] = value;
    }

    /// Weight carried by `dimension`.
    pub fn coordinate_weight(&self, dimension: PhaseSpaceDimension) -> f64 {
        self.weights[dimension.index()]
    }

    /// Set the weight carried by `dimension`.
    pub fn set_coordinate_weight(&mut self, dimension: PhaseSpaceDimension, weight: f64) {
        self.weights[dimension.index()] = weight;
    }

    /// Product of the three spatial coordinate weights.
    pub fn weight_of_spatial_coordinates(&self) -> f64 {
        self.product_of(&PhaseSpaceDimension::SPATIAL)
    }

    /// Product of the three directional coordinate weights.
    pub fn weight_of_directional_coordinates(&self) -> f64 {
        self.product_of(&PhaseSpaceDimension::DIRECTIONAL)
    }

    /// Product of every non-weight coordinate weight times the weight
    /// coordinate itself.
    ///
    /// The weight dimension's own coordinate weight is not included.
    pub fn weight_of_coordinates(&self) -> f64 {
        self.weight_of_spatial_coordinates()
            * self.weight_of_directional_coordinates()
            * self.coordinate_weight(PhaseSpaceDimension::Energy)
            * self.coordinate_weight(PhaseSpaceDimension::Time)
            * self.coordinate(PhaseSpaceDimension::Weight)
    }

    /// Local spatial coordinates `(primary, secondary, tertiary)`.
    pub fn spatial_coordinates(&self) -> [f64; 3] {
        PhaseSpaceDimension::SPATIAL.map(|d| self.coordinate(d))
    }

    /// Local directional coordinates `(primary, secondary, tertiary)`.
    pub fn directional_coordinates(&self) -> [f64; 3] {
        PhaseSpaceDimension::DIRECTIONAL.map(|d| self.coordinate(d))
    }

    /// Spatial position in global Cartesian coordinates.
    pub fn spatial_cartesian(&self) -> [f64; 3] {
        self.spatial.to_cartesian(self.spatial_coordinates())
    }

    /// Direction as a global Cartesian unit vector.
    pub fn directional_cartesian(&self) -> [f64; 3] {
        self.directional.to_cartesian(self.directional_coordinates())
    }

    /// Set the spatial coordinates from a global Cartesian position.
    pub fn set_spatial_from_cartesian(&mut self, position: [f64; 3]) {
        let local = self.spatial.from_cartesian(position);
        for (dim, value) in PhaseSpaceDimension::SPATIAL.into_iter().zip(local) {
            self.set_coordinate(dim, value);
        }
    }

    /// Set the directional coordinates from a global Cartesian direction.
    pub fn set_directional_from_cartesian(&mut self, direction: [f64; 3]) {
        let local = self.directional.from_cartesian(direction);
        for (dim, value) in PhaseSpaceDimension::DIRECTIONAL.into_iter().zip(local) {
            self.set_coordinate(dim, value);
        }
    }

    fn product_of(&self, dims: &[PhaseSpaceDimension]) -> f64 {
        dims.iter().map(|&d| self.coordinate_weight(d)).product()
    }
}

impl Default for PhaseSpacePoint {
    fn default() -> Self {
        Self::new(
            SpatialCoordinateConversion::basic_cartesian(),
            DirectionalCoordinateConversion::basic_cartesian(),
        )
    }
}
