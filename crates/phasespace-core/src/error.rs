//! Error types for the phasespace sampling engine.
//!
//! Two families with different lifetimes:
//!
//! - [`ConfigurationError`]: detected while building distributions and
//!   assembling the dimension tree. Fatal; the object is never created.
//! - [`DomainError`]: detected while evaluating or sampling a single
//!   history. Recoverable; the caller decides whether to reject and
//!   resample. Shared tabulated state is never affected.
//!
//! [`PhaseSpaceError`] tags the two for callers that handle both.

use std::error::Error;
use std::fmt;

use crate::PhaseSpaceDimension;

/// Errors raised at construction or tree-assembly time.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigurationError {
    /// A dependent node was wired to a parent of a different dimension.
    ParentDimensionMismatch {
        /// Dimension of the child node.
        child: PhaseSpaceDimension,
        /// Parent dimension the child declares.
        declared_parent: PhaseSpaceDimension,
        /// Dimension of the node it was wired to.
        wired_parent: PhaseSpaceDimension,
    },
    /// An independent node cannot be wired below another node.
    IndependentChild {
        /// Dimension of the independent node.
        child: PhaseSpaceDimension,
    },
    /// The child node already has a parent.
    AlreadyWired {
        /// Dimension of the child node.
        child: PhaseSpaceDimension,
    },
    /// A node cannot depend on itself.
    SelfDependency {
        /// Dimension of the node.
        dimension: PhaseSpaceDimension,
    },
    /// Wiring the child would make it an ancestor of itself.
    CyclicDependency {
        /// Dimension of the child node.
        child: PhaseSpaceDimension,
        /// Dimension of the would-be parent.
        parent: PhaseSpaceDimension,
    },
    /// A dependent node was never wired to a parent.
    OrphanedDimension {
        /// Dimension of the orphan.
        dimension: PhaseSpaceDimension,
        /// Parent dimension the orphan declares.
        parent: PhaseSpaceDimension,
    },
    /// Two nodes claim the same dimension.
    DuplicateDimension {
        /// The contested dimension.
        dimension: PhaseSpaceDimension,
    },
    /// A node id does not belong to the tree.
    UnknownNode {
        /// The raw node index.
        index: u32,
    },
    /// True and importance distributions cover different primary domains.
    MismatchedPrimaryBounds {
        /// Primary bounds of the true distribution.
        true_bounds: (f64, f64),
        /// Primary bounds of the importance distribution.
        importance_bounds: (f64, f64),
    },
    /// A tabulated two-dimensional grid is malformed.
    InvalidGrid {
        /// Human-readable description of the defect.
        reason: String,
    },
    /// A one-dimensional distribution was given invalid parameters.
    InvalidDistribution {
        /// Name of the distribution type.
        distribution: &'static str,
        /// Human-readable description of the defect.
        reason: String,
    },
    /// A coordinate-conversion policy was given an invalid axis or origin.
    InvalidCoordinateSystem {
        /// Human-readable description of the defect.
        reason: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentDimensionMismatch {
                child,
                declared_parent,
                wired_parent,
            } => write!(
                f,
                "{child} depends on the {declared_parent} but was wired below the {wired_parent}"
            ),
            Self::IndependentChild { child } => {
                write!(f, "independent {child} cannot be wired below a parent")
            }
            Self::AlreadyWired { child } => write!(f, "{child} already has a parent"),
            Self::SelfDependency { dimension } => {
                write!(f, "{dimension} cannot depend on itself")
            }
            Self::CyclicDependency { child, parent } => write!(
                f,
                "wiring the {child} below the {parent} would create a dependency cycle"
            ),
            Self::OrphanedDimension { dimension, parent } => write!(
                f,
                "{dimension} depends on the {parent}, which has no distribution"
            ),
            Self::DuplicateDimension { dimension } => {
                write!(f, "{dimension} has more than one distribution")
            }
            Self::UnknownNode { index } => write!(f, "node {index} is not part of the tree"),
            Self::MismatchedPrimaryBounds {
                true_bounds,
                importance_bounds,
            } => write!(
                f,
                "importance distribution primary bounds [{}, {}] do not match [{}, {}]",
                importance_bounds.0, importance_bounds.1, true_bounds.0, true_bounds.1
            ),
            Self::InvalidGrid { reason } => write!(f, "invalid primary grid: {reason}"),
            Self::InvalidDistribution {
                distribution,
                reason,
            } => write!(f, "invalid {distribution} distribution: {reason}"),
            Self::InvalidCoordinateSystem { reason } => {
                write!(f, "invalid coordinate system: {reason}")
            }
        }
    }
}

impl Error for ConfigurationError {}

/// Errors raised while evaluating or sampling a single history.
#[derive(Clone, Debug, PartialEq)]
pub enum DomainError {
    /// The primary value lies outside the tabulated grid and the call was
    /// made in limit mode.
    PrimaryOutOfRange {
        /// The offending primary value.
        value: f64,
        /// Lower limit of the primary grid.
        lower: f64,
        /// Upper limit of the primary grid.
        upper: f64,
    },
    /// A dependent dimension was asked for a value conditioned on a parent
    /// coordinate outside its tabulated domain.
    ParentOutOfRange {
        /// Dimension being sampled or evaluated.
        dimension: PhaseSpaceDimension,
        /// Parent dimension whose coordinate is out of range.
        parent: PhaseSpaceDimension,
        /// The parent coordinate.
        value: f64,
        /// Lower limit of the primary grid.
        lower: f64,
        /// Upper limit of the primary grid.
        upper: f64,
    },
    /// A value was forced where the sampling density is zero.
    ZeroDensity {
        /// Dimension being set.
        dimension: PhaseSpaceDimension,
        /// The forced value.
        value: f64,
    },
    /// The importance density vanishes where the true density does not.
    InfiniteWeight {
        /// Dimension being weighted.
        dimension: PhaseSpaceDimension,
        /// The value at which the ratio was taken.
        value: f64,
    },
    /// A subrange sample was requested below the support of the
    /// distribution.
    InvalidSubrange {
        /// Requested upper end of the subrange.
        max: f64,
        /// Lower bound of the secondary support.
        lower: f64,
    },
}

impl DomainError {
    /// Attach dimension context to a primary-grid error.
    ///
    /// Other variants already name their dimension and are returned as is.
    pub fn in_dimension(self, dimension: PhaseSpaceDimension, parent: PhaseSpaceDimension) -> Self {
        match self {
            Self::PrimaryOutOfRange {
                value,
                lower,
                upper,
            } => Self::ParentOutOfRange {
                dimension,
                parent,
                value,
                lower,
                upper,
            },
            other => other,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryOutOfRange {
                value,
                lower,
                upper,
            } => write!(
                f,
                "primary value {value} is outside the primary grid [{lower}, {upper}]"
            ),
            Self::ParentOutOfRange {
                dimension,
                parent,
                value,
                lower,
                upper,
            } => write!(
                f,
                "cannot sample the {dimension}: {parent} value {value} is outside [{lower}, {upper}]"
            ),
            Self::ZeroDensity { dimension, value } => {
                write!(f, "{dimension} value {value} has zero density")
            }
            Self::InfiniteWeight { dimension, value } => write!(
                f,
                "{dimension} value {value} has zero importance density but nonzero true density"
            ),
            Self::InvalidSubrange { max, lower } => write!(
                f,
                "subrange upper limit {max} is below the secondary lower bound {lower}"
            ),
        }
    }
}

impl Error for DomainError {}

/// Either kind of error, tagged by severity.
#[derive(Clone, Debug, PartialEq)]
pub enum PhaseSpaceError {
    /// Fatal, assembly-time error.
    Configuration(ConfigurationError),
    /// Recoverable, sampling-time error.
    Domain(DomainError),
}

impl PhaseSpaceError {
    /// Whether the error invalidates the configuration itself.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether the caller may reject the history and resample.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

impl fmt::Display for PhaseSpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "configuration error: {e}"),
            Self::Domain(e) => write!(f, "domain error: {e}"),
        }
    }
}

impl Error for PhaseSpaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Domain(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for PhaseSpaceError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl From<DomainError> for PhaseSpaceError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_gains_dimension_context() {
        let e = DomainError::PrimaryOutOfRange {
            value: 0.05,
            lower: 0.1,
            upper: 0.9,
        }
        .in_dimension(PhaseSpaceDimension::Energy, PhaseSpaceDimension::Time);
        assert_eq!(
            e,
            DomainError::ParentOutOfRange {
                dimension: PhaseSpaceDimension::Energy,
                parent: PhaseSpaceDimension::Time,
                value: 0.05,
                lower: 0.1,
                upper: 0.9,
            }
        );
        let msg = e.to_string();
        assert!(msg.contains("energy dimension"));
        assert!(msg.contains("0.05"));
    }

    #[test]
    fn in_dimension_leaves_other_variants_alone() {
        let e = DomainError::ZeroDensity {
            dimension: PhaseSpaceDimension::Weight,
            value: 2.0,
        };
        assert_eq!(
            e.clone()
                .in_dimension(PhaseSpaceDimension::Energy, PhaseSpaceDimension::Time),
            e
        );
    }

    #[test]
    fn severity_tags() {
        let fatal: PhaseSpaceError = ConfigurationError::DuplicateDimension {
            dimension: PhaseSpaceDimension::Energy,
        }
        .into();
        assert!(fatal.is_fatal());
        assert!(!fatal.is_recoverable());

        let recoverable: PhaseSpaceError = DomainError::InvalidSubrange {
            max: 0.0,
            lower: 1.0,
        }
        .into();
        assert!(recoverable.is_recoverable());
        assert!(recoverable.source().is_some());
    }

    #[test]
    fn mismatch_message_names_both_dimensions() {
        let e = ConfigurationError::ParentDimensionMismatch {
            child: PhaseSpaceDimension::Energy,
            declared_parent: PhaseSpaceDimension::Time,
            wired_parent: PhaseSpaceDimension::PrimarySpatial,
        };
        let msg = e.to_string();
        assert!(msg.contains("energy dimension"));
        assert!(msg.contains("time dimension"));
        assert!(msg.contains("primary spatial dimension"));
    }
}
