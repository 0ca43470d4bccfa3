//! Phase-space dimension tags and the [`DimensionCounterMap`] alias.

use indexmap::IndexMap;
use std::fmt;

/// One coordinate axis of a particle's starting state.
///
/// The discriminant order is the canonical dimension order: spatial axes
/// first, then directional axes, then energy, time and weight. It is also
/// the index used by [`PhaseSpacePoint`](crate::PhaseSpacePoint) storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseSpaceDimension {
    /// First spatial coordinate (x, r, or r depending on the system).
    PrimarySpatial,
    /// Second spatial coordinate (y or azimuthal angle).
    SecondarySpatial,
    /// Third spatial coordinate (z or polar cosine).
    TertiarySpatial,
    /// First directional coordinate (u or r).
    PrimaryDirectional,
    /// Second directional coordinate (v or azimuthal angle).
    SecondaryDirectional,
    /// Third directional coordinate (w or polar cosine).
    TertiaryDirectional,
    /// Particle energy.
    Energy,
    /// Particle birth time.
    Time,
    /// Particle statistical weight.
    Weight,
}

/// Coarse grouping of [`PhaseSpaceDimension`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseSpaceDimensionClass {
    /// The three spatial axes.
    Spatial,
    /// The three directional axes.
    Directional,
    /// The energy axis.
    Energy,
    /// The time axis.
    Time,
    /// The weight axis.
    Weight,
}

impl PhaseSpaceDimension {
    /// Number of phase-space dimensions.
    pub const COUNT: usize = 9;

    /// Every dimension in canonical order.
    pub const ALL: [PhaseSpaceDimension; Self::COUNT] = [
        Self::PrimarySpatial,
        Self::SecondarySpatial,
        Self::TertiarySpatial,
        Self::PrimaryDirectional,
        Self::SecondaryDirectional,
        Self::TertiaryDirectional,
        Self::Energy,
        Self::Time,
        Self::Weight,
    ];

    /// The three spatial dimensions in order.
    pub const SPATIAL: [PhaseSpaceDimension; 3] = [
        Self::PrimarySpatial,
        Self::SecondarySpatial,
        Self::TertiarySpatial,
    ];

    /// The three directional dimensions in order.
    pub const DIRECTIONAL: [PhaseSpaceDimension; 3] = [
        Self::PrimaryDirectional,
        Self::SecondaryDirectional,
        Self::TertiaryDirectional,
    ];

    /// Dense storage index in `0..COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The class this dimension belongs to.
    pub fn class(self) -> PhaseSpaceDimensionClass {
        match self {
            Self::PrimarySpatial | Self::SecondarySpatial | Self::TertiarySpatial => {
                PhaseSpaceDimensionClass::Spatial
            }
            Self::PrimaryDirectional | Self::SecondaryDirectional | Self::TertiaryDirectional => {
                PhaseSpaceDimensionClass::Directional
            }
            Self::Energy => PhaseSpaceDimensionClass::Energy,
            Self::Time => PhaseSpaceDimensionClass::Time,
            Self::Weight => PhaseSpaceDimensionClass::Weight,
        }
    }

    /// Short, stable name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::PrimarySpatial => "primary spatial",
            Self::SecondarySpatial => "secondary spatial",
            Self::TertiarySpatial => "tertiary spatial",
            Self::PrimaryDirectional => "primary directional",
            Self::SecondaryDirectional => "secondary directional",
            Self::TertiaryDirectional => "tertiary directional",
            Self::Energy => "energy",
            Self::Time => "time",
            Self::Weight => "weight",
        }
    }
}

impl fmt::Display for PhaseSpaceDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dimension", self.name())
    }
}

impl fmt::Display for PhaseSpaceDimensionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spatial => "spatial",
            Self::Directional => "directional",
            Self::Energy => "energy",
            Self::Time => "time",
            Self::Weight => "weight",
        };
        write!(f, "{name} dimension class")
    }
}

/// Per-dimension counters, e.g. the number of sampling trials.
///
/// Insertion-ordered so reports list dimensions in the order they were
/// first touched.
pub type DimensionCounterMap = IndexMap<PhaseSpaceDimension, u64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_ordered() {
        for (i, dim) in PhaseSpaceDimension::ALL.iter().enumerate() {
            assert_eq!(dim.index(), i);
        }
    }

    #[test]
    fn classes() {
        for dim in PhaseSpaceDimension::SPATIAL {
            assert_eq!(dim.class(), PhaseSpaceDimensionClass::Spatial);
        }
        for dim in PhaseSpaceDimension::DIRECTIONAL {
            assert_eq!(dim.class(), PhaseSpaceDimensionClass::Directional);
        }
        assert_eq!(
            PhaseSpaceDimension::Energy.class(),
            PhaseSpaceDimensionClass::Energy
        );
        assert_eq!(
            PhaseSpaceDimension::Weight.class(),
            PhaseSpaceDimensionClass::Weight
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(
            PhaseSpaceDimension::PrimarySpatial.to_string(),
            "primary spatial dimension"
        );
        assert_eq!(PhaseSpaceDimension::Time.to_string(), "time dimension");
        assert_eq!(
            PhaseSpaceDimensionClass::Directional.to_string(),
            "directional dimension class"
        );
    }
}
