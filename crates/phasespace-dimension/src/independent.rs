//! Nodes for dimensions with no parent.

use crate::node::PhaseSpaceDimensionDistribution;
use crate::weight::{forced_weight, importance_weight};
use phasespace_core::{DomainError, PhaseSpaceDimension, PhaseSpacePoint, RandomNumberGenerator};
use phasespace_univariate::{UnivariateDistribution, UnivariateDistributionType};
use std::sync::Arc;

/// A dimension sampled from a one-dimensional distribution.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use phasespace_core::{PhaseSpaceDimension, PhaseSpacePoint, ReplayRng};
/// use phasespace_dimension::{IndependentDistribution, PhaseSpaceDimensionDistribution};
/// use phasespace_univariate::Uniform;
///
/// let energy = IndependentDistribution::new(
///     PhaseSpaceDimension::Energy,
///     Arc::new(Uniform::new(1.0, 3.0, 1.0).unwrap()),
/// );
/// let mut point = PhaseSpacePoint::default();
/// let mut rng = ReplayRng::new(vec![0.25]);
/// energy.sample_without_cascade(&mut point, &mut rng).unwrap();
/// assert_eq!(point.coordinate(PhaseSpaceDimension::Energy), 1.5);
/// assert_eq!(energy.distribution_type_name(), "Uniform Distribution");
/// ```
#[derive(Clone, Debug)]
pub struct IndependentDistribution {
    dimension: PhaseSpaceDimension,
    distribution: Arc<dyn UnivariateDistribution>,
}

impl IndependentDistribution {
    /// Sample `dimension` from `distribution`.
    pub fn new(dimension: PhaseSpaceDimension, distribution: Arc<dyn UnivariateDistribution>) -> Self {
        Self {
            dimension,
            distribution,
        }
    }

    /// The underlying distribution.
    pub fn distribution(&self) -> &Arc<dyn UnivariateDistribution> {
        &self.distribution
    }

    fn set(&self, point: &mut PhaseSpacePoint, value: f64, weight: f64) {
        point.set_coordinate(self.dimension, value);
        point.set_coordinate_weight(self.dimension, weight);
    }
}

impl PhaseSpaceDimensionDistribution for IndependentDistribution {
    fn dimension(&self) -> PhaseSpaceDimension {
        self.dimension
    }

    fn parent_dimension(&self) -> Option<PhaseSpaceDimension> {
        None
    }

    fn distribution_type_name(&self) -> String {
        self.distribution.distribution_type().to_string()
    }

    fn is_continuous(&self) -> bool {
        self.distribution.is_continuous()
    }

    fn is_tabular(&self) -> bool {
        self.distribution.is_tabular()
    }

    fn is_uniform(&self) -> bool {
        self.distribution.is_uniform()
    }

    fn has_form(&self, form: UnivariateDistributionType) -> bool {
        self.distribution.has_form(form)
    }

    fn evaluate_without_cascade(&self, point: &PhaseSpacePoint) -> Result<f64, DomainError> {
        Ok(self.distribution.evaluate(point.coordinate(self.dimension)))
    }

    fn sample_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
    ) -> Result<(), DomainError> {
        let value = self.distribution.sample(rng);
        self.set(point, value, 1.0);
        Ok(())
    }

    fn sample_and_record_trials_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut u64,
    ) -> Result<(), DomainError> {
        let value = self.distribution.sample_and_record_trials(rng, trials);
        self.set(point, value, 1.0);
        Ok(())
    }

    fn set_dimension_value_and_apply_weight(
        &self,
        point: &mut PhaseSpacePoint,
        value: f64,
    ) -> Result<(), DomainError> {
        let weight = forced_weight(self.dimension, value, self.distribution.evaluate_pdf(value))?;
        self.set(point, value, weight);
        Ok(())
    }
}

/// A dimension sampled from an importance distribution and weighted back
/// to its true distribution.
///
/// Evaluation always reports the true density.
#[derive(Clone, Debug)]
pub struct ImportanceSampledIndependentDistribution {
    inner: IndependentDistribution,
    importance: Arc<dyn UnivariateDistribution>,
}

impl ImportanceSampledIndependentDistribution {
    /// Evaluate `dimension` with `distribution` but sample it from
    /// `importance`.
    pub fn new(
        dimension: PhaseSpaceDimension,
        distribution: Arc<dyn UnivariateDistribution>,
        importance: Arc<dyn UnivariateDistribution>,
    ) -> Self {
        Self {
            inner: IndependentDistribution::new(dimension, distribution),
            importance,
        }
    }

    /// The true distribution.
    pub fn distribution(&self) -> &Arc<dyn UnivariateDistribution> {
        self.inner.distribution()
    }

    /// The distribution samples are drawn from.
    pub fn importance_distribution(&self) -> &Arc<dyn UnivariateDistribution> {
        &self.importance
    }

    fn weight(&self, value: f64) -> Result<f64, DomainError> {
        importance_weight(
            self.inner.dimension,
            value,
            self.inner.distribution.evaluate_pdf(value),
            self.importance.evaluate_pdf(value),
        )
    }

    fn apply(&self, point: &mut PhaseSpacePoint, value: f64) -> Result<(), DomainError> {
        let weight = self.weight(value)?;
        self.inner.set(point, value, weight);
        Ok(())
    }
}

impl PhaseSpaceDimensionDistribution for ImportanceSampledIndependentDistribution {
    fn dimension(&self) -> PhaseSpaceDimension {
        self.inner.dimension
    }

    fn parent_dimension(&self) -> Option<PhaseSpaceDimension> {
        None
    }

    fn distribution_type_name(&self) -> String {
        self.inner.distribution_type_name()
    }

    fn is_continuous(&self) -> bool {
        self.inner.is_continuous()
    }

    fn is_tabular(&self) -> bool {
        self.inner.is_tabular()
    }

    fn is_uniform(&self) -> bool {
        self.inner.is_uniform()
    }

    fn has_form(&self, form: UnivariateDistributionType) -> bool {
        self.inner.has_form(form)
    }

    fn evaluate_without_cascade(&self, point: &PhaseSpacePoint) -> Result<f64, DomainError> {
        self.inner.evaluate_without_cascade(point)
    }

    fn sample_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
    ) -> Result<(), DomainError> {
        let value = self.importance.sample(rng);
        self.apply(point, value)
    }

    fn sample_and_record_trials_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut u64,
    ) -> Result<(), DomainError> {
        let value = self.importance.sample_and_record_trials(rng, trials);
        self.apply(point, value)
    }

    fn set_dimension_value_and_apply_weight(
        &self,
        point: &mut PhaseSpacePoint,
        value: f64,
    ) -> Result<(), DomainError> {
        self.apply(point, value)
    }
}
