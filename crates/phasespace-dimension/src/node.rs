//! The [`PhaseSpaceDimensionDistribution`] trait.
//!
//! A node owns the distribution of a single phase-space dimension. It
//! evaluates and samples that dimension only, reading its parent's
//! coordinate from the point when it has one. Cascading to children is the
//! job of the [`DimensionTree`](crate::DimensionTree).

use phasespace_core::{
    DomainError, PhaseSpaceDimension, PhaseSpaceDimensionClass, PhaseSpacePoint,
    RandomNumberGenerator,
};
use phasespace_univariate::UnivariateDistributionType;

/// The distribution of one phase-space dimension, possibly conditioned on a
/// parent dimension.
///
/// # Contract
///
/// - Every method is `&self`; nodes are immutable once built and shared
///   across histories.
/// - Sampling sets both the coordinate and its weight on the point.
/// - Domain errors leave the point's coordinate for this dimension
///   unchanged.
///
/// # Object safety
///
/// This trait is object-safe; the tree stores nodes as
/// `Arc<dyn PhaseSpaceDimensionDistribution>`.
pub trait PhaseSpaceDimensionDistribution: Send + Sync + 'static {
    /// The dimension this node samples.
    fn dimension(&self) -> PhaseSpaceDimension;

    /// Class of [`dimension`](Self::dimension).
    fn dimension_class(&self) -> PhaseSpaceDimensionClass {
        self.dimension().class()
    }

    /// The dimension this node is conditioned on, if any.
    fn parent_dimension(&self) -> Option<PhaseSpaceDimension>;

    /// Whether the node has no parent dimension.
    fn is_independent(&self) -> bool {
        self.parent_dimension().is_none()
    }

    /// Whether the node is conditioned on `dimension`.
    fn is_dependent_on_dimension(&self, dimension: PhaseSpaceDimension) -> bool {
        self.parent_dimension() == Some(dimension)
    }

    /// Name of the underlying distribution type.
    fn distribution_type_name(&self) -> String;

    /// Whether the distribution is continuous.
    ///
    /// Dependent nodes answer for the parent axis only.
    fn is_continuous(&self) -> bool;

    /// Whether the distribution is tabular.
    ///
    /// Dependent nodes answer for the parent axis only.
    fn is_tabular(&self) -> bool;

    /// Whether the distribution is uniform.
    fn is_uniform(&self) -> bool;

    /// Whether the distribution has the given one-dimensional form.
    fn has_form(&self, form: UnivariateDistributionType) -> bool;

    /// Density of this dimension's coordinate, conditioned on the parent's.
    fn evaluate_without_cascade(&self, point: &PhaseSpacePoint) -> Result<f64, DomainError>;

    /// Draw this dimension's coordinate and weight.
    fn sample_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
    ) -> Result<(), DomainError>;

    /// Draw as [`sample_without_cascade`](Self::sample_without_cascade),
    /// adding the number of internal trials to `trials`.
    fn sample_and_record_trials_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut u64,
    ) -> Result<(), DomainError>;

    /// Force this dimension's coordinate to `value` and set the weight that
    /// keeps the estimate unbiased.
    fn set_dimension_value_and_apply_weight(
        &self,
        point: &mut PhaseSpacePoint,
        value: f64,
    ) -> Result<(), DomainError>;
}
