//! Reusable dimension-node doubles.
//!
//! - [`FixedNode`]: always lands on the same coordinate, draws nothing.
//! - [`FailingNode`]: succeeds a set number of times, then fails.
//! - [`ThresholdNode`]: uses one random number as its coordinate and fails
//!   when it reaches a threshold.

use phasespace_core::{
    DomainError, PhaseSpaceDimension, PhaseSpacePoint, RandomNumberGenerator,
};
use phasespace_dimension::PhaseSpaceDimensionDistribution;
use phasespace_univariate::UnivariateDistributionType;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sets a fixed coordinate with a fixed density.
///
/// Counts its samples so tests can check which nodes a cascade visited.
#[derive(Debug)]
pub struct FixedNode {
    pub dimension: PhaseSpaceDimension,
    pub parent: Option<PhaseSpaceDimension>,
    pub value: f64,
    pub density: f64,
    samples: AtomicUsize,
}

impl FixedNode {
    pub fn new(dimension: PhaseSpaceDimension, value: f64) -> Self {
        Self {
            dimension,
            parent: None,
            value,
            density: 1.0,
            samples: AtomicUsize::new(0),
        }
    }

    pub fn below(mut self, parent: PhaseSpaceDimension) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// How many times the node has been sampled.
    pub fn samples(&self) -> usize {
        self.samples.load(Ordering::Relaxed)
    }
}

impl PhaseSpaceDimensionDistribution for FixedNode {
    fn dimension(&self) -> PhaseSpaceDimension {
        self.dimension
    }

    fn parent_dimension(&self) -> Option<PhaseSpaceDimension> {
        self.parent
    }

    fn distribution_type_name(&self) -> String {
        "Fixed".to_string()
    }

    fn is_continuous(&self) -> bool {
        false
    }

    fn is_tabular(&self) -> bool {
        true
    }

    fn is_uniform(&self) -> bool {
        false
    }

    fn has_form(&self, form: UnivariateDistributionType) -> bool {
        form == UnivariateDistributionType::Delta
    }

    fn evaluate_without_cascade(&self, point: &PhaseSpacePoint) -> Result<f64, DomainError> {
        Ok(if point.coordinate(self.dimension) == self.value {
            self.density
        } else {
            0.0
        })
    }

    fn sample_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        _rng: &mut dyn RandomNumberGenerator,
    ) -> Result<(), DomainError> {
        self.samples.fetch_add(1, Ordering::Relaxed);
        point.set_coordinate(self.dimension, self.value);
        point.set_coordinate_weight(self.dimension, 1.0);
        Ok(())
    }

    fn sample_and_record_trials_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut u64,
    ) -> Result<(), DomainError> {
        self.sample_without_cascade(point, rng)?;
        *trials += 1;
        Ok(())
    }

    fn set_dimension_value_and_apply_weight(
        &self,
        point: &mut PhaseSpacePoint,
        value: f64,
    ) -> Result<(), DomainError> {
        point.set_coordinate(self.dimension, value);
        point.set_coordinate_weight(self.dimension, self.density);
        Ok(())
    }
}

/// Samples like a [`FixedNode`] for `succeed_count` calls, then fails every
/// call with [`DomainError::ZeroDensity`].
///
/// Uses `AtomicUsize` for the call counter so it satisfies `Sync`.
#[derive(Debug)]
pub struct FailingNode {
    inner: FixedNode,
    pub succeed_count: usize,
    calls: AtomicUsize,
}

impl FailingNode {
    pub fn new(dimension: PhaseSpaceDimension, succeed_count: usize) -> Self {
        Self {
            inner: FixedNode::new(dimension, 0.0),
            succeed_count,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn below(mut self, parent: PhaseSpaceDimension) -> Self {
        self.inner = self.inner.below(parent);
        self
    }

    /// How many sampling calls the node has seen.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), DomainError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(DomainError::ZeroDensity {
                dimension: self.inner.dimension,
                value: self.inner.value,
            });
        }
        Ok(())
    }
}

impl PhaseSpaceDimensionDistribution for FailingNode {
    fn dimension(&self) -> PhaseSpaceDimension {
        self.inner.dimension
    }

    fn parent_dimension(&self) -> Option<PhaseSpaceDimension> {
        self.inner.parent
    }

    fn distribution_type_name(&self) -> String {
        "Failing".to_string()
    }

    fn is_continuous(&self) -> bool {
        false
    }

    fn is_tabular(&self) -> bool {
        true
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
        self.check()?;
        self.inner.sample_without_cascade(point, rng)
    }

    fn sample_and_record_trials_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut u64,
    ) -> Result<(), DomainError> {
        self.check()?;
        self.inner
            .sample_and_record_trials_without_cascade(point, rng, trials)
    }

    fn set_dimension_value_and_apply_weight(
        &self,
        point: &mut PhaseSpacePoint,
        value: f64,
    ) -> Result<(), DomainError> {
        self.check()?;
        self.inner.set_dimension_value_and_apply_weight(point, value)
    }
}

/// Draws one random number `u`, sets it as the coordinate with weight
/// `1 + u`, and fails with [`DomainError::ZeroDensity`] when
/// `u >= threshold`.
///
/// Stateless, so the outcome depends only on the random stream.
#[derive(Clone, Copy, Debug)]
pub struct ThresholdNode {
    pub dimension: PhaseSpaceDimension,
    pub threshold: f64,
}

impl ThresholdNode {
    pub fn new(dimension: PhaseSpaceDimension, threshold: f64) -> Self {
        Self {
            dimension,
            threshold,
        }
    }

    fn draw(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
    ) -> Result<(), DomainError> {
        let u = rng.next_uniform();
        if u >= self.threshold {
            return Err(DomainError::ZeroDensity {
                dimension: self.dimension,
                value: u,
            });
        }
        point.set_coordinate(self.dimension, u);
        point.set_coordinate_weight(self.dimension, 1.0 + u);
        Ok(())
    }
}

impl PhaseSpaceDimensionDistribution for ThresholdNode {
    fn dimension(&self) -> PhaseSpaceDimension {
        self.dimension
    }

    fn parent_dimension(&self) -> Option<PhaseSpaceDimension> {
        None
    }

    fn distribution_type_name(&self) -> String {
        "Threshold".to_string()
    }

    fn is_continuous(&self) -> bool {
        true
    }

    fn is_tabular(&self) -> bool {
        true
    }

    fn is_uniform(&self) -> bool {
        true
    }

    fn has_form(&self, form: UnivariateDistributionType) -> bool {
        form == UnivariateDistributionType::Uniform
    }

    fn evaluate_without_cascade(&self, point: &PhaseSpacePoint) -> Result<f64, DomainError> {
        let u = point.coordinate(self.dimension);
        Ok(if (0.0..self.threshold).contains(&u) {
            1.0
        } else {
            0.0
        })
    }

    fn sample_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
    ) -> Result<(), DomainError> {
        self.draw(point, rng)
    }

    fn sample_and_record_trials_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut u64,
    ) -> Result<(), DomainError> {
        self.draw(point, rng)?;
        *trials += 1;
        Ok(())
    }

    fn set_dimension_value_and_apply_weight(
        &self,
        point: &mut PhaseSpacePoint,
        value: f64,
    ) -> Result<(), DomainError> {
        point.set_coordinate(self.dimension, value);
        point.set_coordinate_weight(self.dimension, 1.0);
        Ok(())
    }
}
