//! Nodes for dimensions conditioned on a parent dimension.

use crate::node::PhaseSpaceDimensionDistribution;
use crate::weight::{forced_weight, importance_weight};
use phasespace_bivariate::{
    FullyTabularTwoDDistribution, PrimaryLimitMode, SecondaryDistribution, TwoDDistribution,
};
use phasespace_core::{
    ConfigurationError, DomainError, PhaseSpaceDimension, PhaseSpacePoint, RandomNumberGenerator,
};
use phasespace_univariate::{UnivariateDistribution, UnivariateDistributionType};
use std::fmt;
use std::sync::Arc;

/// Name reported by every dependent node.
const BIVARIATE_TYPE_NAME: &str = "BasicBivariateDistribution";

/// A dimension sampled from a two-dimensional table whose primary variable
/// is the parent dimension's coordinate.
///
/// Parent coordinates outside the table's primary grid follow the node's
/// [`PrimaryLimitMode`]: a [`DomainError::ParentOutOfRange`] in limit mode
/// (the default), the nearest boundary distribution in extend mode.
pub struct DependentDistribution<D: ?Sized = dyn UnivariateDistribution> {
    dimension: PhaseSpaceDimension,
    parent: PhaseSpaceDimension,
    table: Arc<TwoDDistribution<D>>,
    mode: PrimaryLimitMode,
}

impl<D: ?Sized> Clone for DependentDistribution<D> {
    fn clone(&self) -> Self {
        Self {
            dimension: self.dimension,
            parent: self.parent,
            table: Arc::clone(&self.table),
            mode: self.mode,
        }
    }
}

impl<D: SecondaryDistribution + ?Sized> fmt::Debug for DependentDistribution<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependentDistribution")
            .field("dimension", &self.dimension)
            .field("parent", &self.parent)
            .field("policy", &self.table.policy())
            .field("mode", &self.mode)
            .finish()
    }
}

impl<D: SecondaryDistribution + ?Sized> DependentDistribution<D> {
    /// Sample `dimension` from `table` given the `parent` coordinate.
    ///
    /// Fails with [`ConfigurationError::SelfDependency`] when the two
    /// dimensions are the same.
    pub fn new(
        parent: PhaseSpaceDimension,
        dimension: PhaseSpaceDimension,
        table: Arc<TwoDDistribution<D>>,
    ) -> Result<Self, ConfigurationError> {
        if parent == dimension {
            return Err(ConfigurationError::SelfDependency { dimension });
        }
        Ok(Self {
            dimension,
            parent,
            table,
            mode: PrimaryLimitMode::Limit,
        })
    }

    /// Treat out-of-grid parent coordinates according to `mode`.
    pub fn with_limit_mode(mut self, mode: PrimaryLimitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Current out-of-grid behaviour.
    pub fn limit_mode(&self) -> PrimaryLimitMode {
        self.mode
    }

    /// The two-dimensional table.
    pub fn table(&self) -> &Arc<TwoDDistribution<D>> {
        &self.table
    }

    fn context(&self, e: DomainError) -> DomainError {
        e.in_dimension(self.dimension, self.parent)
    }

    fn parent_value(&self, point: &PhaseSpacePoint) -> f64 {
        point.coordinate(self.parent)
    }

    /// Density the node's samples are drawn with, at `value`.
    fn sampling_pdf(&self, parent: f64, value: f64) -> Result<f64, DomainError> {
        self.table
            .evaluate_secondary_conditional_pdf_exact(parent, value, self.mode)
            .map_err(|e| self.context(e))
    }

    fn draw(
        &self,
        point: &PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: Option<&mut u64>,
    ) -> Result<f64, DomainError> {
        let parent = self.parent_value(point);
        let drawn = match trials {
            Some(trials) => self
                .table
                .sample_secondary_conditional_and_record_trials(parent, rng, trials, self.mode),
            None => self.table.sample_secondary_conditional(parent, rng, self.mode),
        };
        drawn.map_err(|e| self.context(e))
    }

    fn set(&self, point: &mut PhaseSpacePoint, value: f64, weight: f64) {
        point.set_coordinate(self.dimension, value);
        point.set_coordinate_weight(self.dimension, weight);
    }
}

impl<D> PhaseSpaceDimensionDistribution for DependentDistribution<D>
where
    D: SecondaryDistribution + ?Sized + Send + Sync + 'static,
{
    fn dimension(&self) -> PhaseSpaceDimension {
        self.dimension
    }

    fn parent_dimension(&self) -> Option<PhaseSpaceDimension> {
        Some(self.parent)
    }

    fn distribution_type_name(&self) -> String {
        BIVARIATE_TYPE_NAME.to_string()
    }

    fn is_continuous(&self) -> bool {
        self.table.is_primary_dimension_continuous()
    }

    fn is_tabular(&self) -> bool {
        self.table.is_primary_dimension_tabular()
    }

    // A table cannot be shown to keep one form across its whole grid.
    fn is_uniform(&self) -> bool {
        false
    }

    fn has_form(&self, _form: UnivariateDistributionType) -> bool {
        false
    }

    fn evaluate_without_cascade(&self, point: &PhaseSpacePoint) -> Result<f64, DomainError> {
        self.table
            .evaluate(
                self.parent_value(point),
                point.coordinate(self.dimension),
                self.mode,
            )
            .map_err(|e| self.context(e))
    }

    fn sample_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
    ) -> Result<(), DomainError> {
        let value = self.draw(point, rng, None)?;
        self.set(point, value, 1.0);
        Ok(())
    }

    fn sample_and_record_trials_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut u64,
    ) -> Result<(), DomainError> {
        let value = self.draw(point, rng, Some(trials))?;
        self.set(point, value, 1.0);
        Ok(())
    }

    fn set_dimension_value_and_apply_weight(
        &self,
        point: &mut PhaseSpacePoint,
        value: f64,
    ) -> Result<(), DomainError> {
        let density = self.sampling_pdf(self.parent_value(point), value)?;
        let weight = forced_weight(self.dimension, value, density)?;
        self.set(point, value, weight);
        Ok(())
    }
}

/// A dependent dimension sampled from a fully tabular importance table
/// and weighted back to its true table.
///
/// Evaluation always reports the true value.
pub struct ImportanceSampledDependentDistribution<D: ?Sized = dyn UnivariateDistribution> {
    inner: DependentDistribution<D>,
    importance: Arc<FullyTabularTwoDDistribution>,
}

impl<D: ?Sized> Clone for ImportanceSampledDependentDistribution<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            importance: Arc::clone(&self.importance),
        }
    }
}

impl<D: SecondaryDistribution + ?Sized> fmt::Debug for ImportanceSampledDependentDistribution<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportanceSampledDependentDistribution")
            .field("inner", &self.inner)
            .field("importance_policy", &self.importance.policy())
            .finish()
    }
}

impl<D: SecondaryDistribution + ?Sized> ImportanceSampledDependentDistribution<D> {
    /// Evaluate `dimension` with `table` but sample it from `importance`.
    ///
    /// The two tables must share primary bounds.
    pub fn new(
        parent: PhaseSpaceDimension,
        dimension: PhaseSpaceDimension,
        table: Arc<TwoDDistribution<D>>,
        importance: Arc<FullyTabularTwoDDistribution>,
    ) -> Result<Self, ConfigurationError> {
        if !table.has_same_primary_bounds(&*importance) {
            return Err(ConfigurationError::MismatchedPrimaryBounds {
                true_bounds: (
                    table.lower_bound_of_primary_indep_var(),
                    table.upper_bound_of_primary_indep_var(),
                ),
                importance_bounds: (
                    importance.lower_bound_of_primary_indep_var(),
                    importance.upper_bound_of_primary_indep_var(),
                ),
            });
        }
        Ok(Self {
            inner: DependentDistribution::new(parent, dimension, table)?,
            importance,
        })
    }

    /// Treat out-of-grid parent coordinates according to `mode`, for both
    /// tables.
    pub fn with_limit_mode(mut self, mode: PrimaryLimitMode) -> Self {
        self.inner = self.inner.with_limit_mode(mode);
        self
    }

    /// Current out-of-grid behaviour.
    pub fn limit_mode(&self) -> PrimaryLimitMode {
        self.inner.mode
    }

    /// The true table.
    pub fn table(&self) -> &Arc<TwoDDistribution<D>> {
        self.inner.table()
    }

    /// The table samples are drawn from.
    pub fn importance_table(&self) -> &Arc<FullyTabularTwoDDistribution> {
        &self.importance
    }

    fn weight(&self, parent: f64, value: f64) -> Result<f64, DomainError> {
        let importance = self
            .importance
            .evaluate_secondary_conditional_pdf_exact(parent, value, self.inner.mode)
            .map_err(|e| self.inner.context(e))?;
        importance_weight(
            self.inner.dimension,
            value,
            self.inner.sampling_pdf(parent, value)?,
            importance,
        )
    }

    fn apply(&self, point: &mut PhaseSpacePoint, value: f64) -> Result<(), DomainError> {
        let weight = self.weight(self.inner.parent_value(point), value)?;
        self.inner.set(point, value, weight);
        Ok(())
    }

    fn draw(
        &self,
        point: &PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: Option<&mut u64>,
    ) -> Result<f64, DomainError> {
        let parent = self.inner.parent_value(point);
        let mode = self.inner.mode;
        let drawn = match trials {
            Some(trials) => self
                .importance
                .sample_secondary_conditional_and_record_trials(parent, rng, trials, mode),
            None => self.importance.sample_secondary_conditional(parent, rng, mode),
        };
        drawn.map_err(|e| self.inner.context(e))
    }
}

impl<D> PhaseSpaceDimensionDistribution for ImportanceSampledDependentDistribution<D>
where
    D: SecondaryDistribution + ?Sized + Send + Sync + 'static,
{
    fn dimension(&self) -> PhaseSpaceDimension {
        self.inner.dimension
    }

    fn parent_dimension(&self) -> Option<PhaseSpaceDimension> {
        Some(self.inner.parent)
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
        false
    }

    fn has_form(&self, _form: UnivariateDistributionType) -> bool {
        false
    }

    fn evaluate_without_cascade(&self, point: &PhaseSpacePoint) -> Result<f64, DomainError> {
        self.inner.evaluate_without_cascade(point)
    }

    fn sample_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
    ) -> Result<(), DomainError> {
        let value = self.draw(point, rng, None)?;
        self.apply(point, value)
    }

    fn sample_and_record_trials_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut u64,
    ) -> Result<(), DomainError> {
        let value = self.draw(point, rng, Some(trials))?;
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
