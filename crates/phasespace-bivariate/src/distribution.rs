//! [`TwoDDistribution`]: a primary grid of secondary distributions.

use crate::bin::{Bin, UnitBase};
use crate::interp::InterpAxis;
use crate::policy::{PrimaryLimitMode, TwoDGridPolicy};
use phasespace_core::{ConfigurationError, DomainError};
use phasespace_univariate::{TabularUnivariateDistribution, UnivariateDistribution};
use std::fmt;
use std::sync::Arc;

/// A secondary distribution stored in a [`TwoDDistribution`].
///
/// Implemented for the two trait objects the tables hold. Tables of
/// tabular secondaries expose exact CDF inversion through
/// [`as_tabular`](Self::as_tabular).
pub trait SecondaryDistribution: UnivariateDistribution {
    /// This distribution as a tabular one, if it is.
    fn as_tabular(&self) -> Option<&dyn TabularUnivariateDistribution>;
}

impl SecondaryDistribution for dyn UnivariateDistribution {
    fn as_tabular(&self) -> Option<&dyn TabularUnivariateDistribution> {
        None
    }
}

impl SecondaryDistribution for dyn TabularUnivariateDistribution {
    fn as_tabular(&self) -> Option<&dyn TabularUnivariateDistribution> {
        Some(self)
    }
}

/// Where a primary value falls on the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Location {
    Below,
    Above,
    /// Exactly on grid point `i`; for repeated points, the last copy.
    OnBoundary(usize),
    /// Strictly between grid points `i` and `i + 1`.
    Inside(usize),
}

/// The distribution(s) a primary value resolves to under the grid policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Bracket {
    /// Use boundary `i` unchanged.
    Single(usize),
    /// Combine boundaries `i` and `i + 1`.
    Between(usize),
}

/// Tabulated two-dimensional distribution: a non-decreasing primary grid
/// with one secondary distribution per grid point.
///
/// Immutable after construction and shared across sampling threads. A
/// repeated grid point encodes a discontinuity: the later copy owns the
/// values at and after it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use phasespace_bivariate::{FullyTabularTwoDDistribution, PrimaryLimitMode, TwoDGridPolicy};
/// use phasespace_univariate::{TabularUnivariateDistribution, Uniform};
///
/// let bins: Vec<Arc<dyn TabularUnivariateDistribution>> = vec![
///     Arc::new(Uniform::new(0.5, 0.9, 0.5).unwrap()),
///     Arc::new(Uniform::new(0.6, 0.8, 0.4).unwrap()),
///     Arc::new(Uniform::new(0.6, 0.8, 0.4).unwrap()),
/// ];
/// let grid = vec![0.1, 0.5, 0.9];
/// let table =
///     FullyTabularTwoDDistribution::fully_tabular(grid, bins, TwoDGridPolicy::Histogram).unwrap();
/// assert_eq!(table.evaluate(0.3, 0.5, PrimaryLimitMode::Limit), Ok(0.5));
/// assert!(table.evaluate(1.0, 0.7, PrimaryLimitMode::Limit).is_err());
/// assert_eq!(table.evaluate(1.0, 0.7, PrimaryLimitMode::Extend), Ok(0.4));
/// ```
pub struct TwoDDistribution<D: ?Sized = dyn UnivariateDistribution> {
    pub(crate) grid: Vec<f64>,
    pub(crate) secondary: Vec<Arc<D>>,
    pub(crate) policy: TwoDGridPolicy,
}

/// A table whose secondaries may lack a closed-form CDF.
pub type PartiallyTabularTwoDDistribution = TwoDDistribution<dyn UnivariateDistribution>;

/// A table whose secondaries can all be inverted exactly.
pub type FullyTabularTwoDDistribution = TwoDDistribution<dyn TabularUnivariateDistribution>;

// Compile-time assertion: tables are shared across sampling threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<PartiallyTabularTwoDDistribution>();
    assert::<FullyTabularTwoDDistribution>();
};

impl<D: ?Sized> Clone for TwoDDistribution<D> {
    fn clone(&self) -> Self {
        Self {
            grid: self.grid.clone(),
            secondary: self.secondary.clone(),
            policy: self.policy,
        }
    }
}

impl<D: fmt::Debug + ?Sized> fmt::Debug for TwoDDistribution<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoDDistribution")
            .field("policy", &self.policy)
            .field("grid", &self.grid)
            .field("secondary", &self.secondary)
            .finish()
    }
}

fn invalid(reason: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidGrid {
        reason: reason.into(),
    }
}

fn validate_grid(
    grid: &[f64],
    secondary_count: usize,
    policy: TwoDGridPolicy,
) -> Result<(), ConfigurationError> {
    if grid.len() < 2 {
        return Err(invalid(format!(
            "needs at least 2 grid points, got {}",
            grid.len()
        )));
    }
    if grid.len() != secondary_count {
        return Err(invalid(format!(
            "{} grid points but {} secondary distributions",
            grid.len(),
            secondary_count
        )));
    }
    if let Some(bad) = grid.iter().find(|g| !g.is_finite()) {
        return Err(invalid(format!("grid point {bad} is not finite")));
    }
    if let Some(w) = grid.windows(2).find(|w| w[1] < w[0]) {
        return Err(invalid(format!(
            "grid decreases from {} to {}",
            w[0], w[1]
        )));
    }
    if grid[0] == grid[grid.len() - 1] {
        return Err(invalid("grid spans no primary range"));
    }
    if let Some(interp) = policy.interp() {
        if interp.primary == InterpAxis::Log && grid[0] <= 0.0 {
            return Err(invalid(format!(
                "{interp} needs a positive primary grid, first point is {}",
                grid[0]
            )));
        }
    }
    Ok(())
}

impl PartiallyTabularTwoDDistribution {
    /// Build a table from any secondary distributions.
    ///
    /// Correlated policies need exact inversion and are rejected here; build
    /// those with `FullyTabularTwoDDistribution::fully_tabular`.
    pub fn partially_tabular(
        grid: Vec<f64>,
        secondary: Vec<Arc<dyn UnivariateDistribution>>,
        policy: TwoDGridPolicy,
    ) -> Result<Self, ConfigurationError> {
        validate_grid(&grid, secondary.len(), policy)?;
        if policy.is_correlated() {
            return Err(invalid(format!(
                "{policy} policy needs tabular secondary distributions"
            )));
        }
        Ok(Self {
            grid,
            secondary,
            policy,
        })
    }
}

impl FullyTabularTwoDDistribution {
    /// Build a table from tabular secondary distributions.
    pub fn fully_tabular(
        grid: Vec<f64>,
        secondary: Vec<Arc<dyn TabularUnivariateDistribution>>,
        policy: TwoDGridPolicy,
    ) -> Result<Self, ConfigurationError> {
        validate_grid(&grid, secondary.len(), policy)?;
        Ok(Self {
            grid,
            secondary,
            policy,
        })
    }
}

impl<D: SecondaryDistribution + ?Sized> TwoDDistribution<D> {
    /// The primary grid.
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// One secondary distribution per grid point.
    pub fn secondary_distributions(&self) -> &[Arc<D>] {
        &self.secondary
    }

    /// The grid policy.
    pub fn policy(&self) -> TwoDGridPolicy {
        self.policy
    }

    /// First grid point.
    pub fn lower_bound_of_primary_indep_var(&self) -> f64 {
        self.grid[0]
    }

    /// Last grid point.
    pub fn upper_bound_of_primary_indep_var(&self) -> f64 {
        self.grid[self.grid.len() - 1]
    }

    /// Whether the primary variable is tabulated. Always true.
    pub fn is_primary_dimension_tabular(&self) -> bool {
        true
    }

    /// Whether the primary variable is continuous. Always true.
    pub fn is_primary_dimension_continuous(&self) -> bool {
        true
    }

    /// Whether `other` covers exactly the same primary range.
    pub fn has_same_primary_bounds<E: SecondaryDistribution + ?Sized>(
        &self,
        other: &TwoDDistribution<E>,
    ) -> bool {
        self.lower_bound_of_primary_indep_var() == other.lower_bound_of_primary_indep_var()
            && self.upper_bound_of_primary_indep_var() == other.upper_bound_of_primary_indep_var()
    }

    pub(crate) fn primary_limits(&self) -> (f64, f64) {
        (
            self.lower_bound_of_primary_indep_var(),
            self.upper_bound_of_primary_indep_var(),
        )
    }

    pub(crate) fn locate(&self, x: f64, mode: PrimaryLimitMode) -> Result<Location, DomainError> {
        let (lower, upper) = self.primary_limits();
        if x.is_nan() || x < lower || x > upper {
            return match mode {
                PrimaryLimitMode::Limit => Err(DomainError::PrimaryOutOfRange {
                    value: x,
                    lower,
                    upper,
                }),
                PrimaryLimitMode::Extend if x > upper => Ok(Location::Above),
                PrimaryLimitMode::Extend => Ok(Location::Below),
            };
        }
        let i = self.grid.partition_point(|g| *g <= x) - 1;
        if self.grid[i] == x {
            Ok(Location::OnBoundary(i))
        } else {
            Ok(Location::Inside(i))
        }
    }

    pub(crate) fn bracket(&self, x: f64, mode: PrimaryLimitMode) -> Result<Bracket, DomainError> {
        let last = self.grid.len() - 1;
        Ok(match (self.policy, self.locate(x, mode)?) {
            (_, Location::Below) => Bracket::Single(0),
            (_, Location::Above) => Bracket::Single(last),
            (TwoDGridPolicy::Histogram, Location::OnBoundary(i) | Location::Inside(i)) => {
                Bracket::Single(i.min(last - 1))
            }
            (_, Location::OnBoundary(i)) => Bracket::Single(i),
            (_, Location::Inside(i)) => Bracket::Between(i),
        })
    }

    pub(crate) fn bin(&self, i: usize, x: f64) -> Bin<'_, D> {
        Bin::new(
            self.policy,
            (self.grid[i], self.grid[i + 1]),
            x,
            &*self.secondary[i],
            &*self.secondary[i + 1],
        )
    }

    /// Index of the primary bin containing `x`.
    ///
    /// Bins are half-open except the last, which the last grid point
    /// closes. Below the grid the index is `0`; above it, the index of the
    /// last grid point.
    pub fn primary_bin_index(&self, x: f64, mode: PrimaryLimitMode) -> Result<usize, DomainError> {
        let last = self.grid.len() - 1;
        Ok(match self.locate(x, mode)? {
            Location::Below => 0,
            Location::Above => last,
            Location::OnBoundary(i) | Location::Inside(i) => i.min(last - 1),
        })
    }

    fn secondary_limits(&self, x: f64, mode: PrimaryLimitMode) -> Result<(f64, f64), DomainError> {
        Ok(match self.bracket(x, mode)? {
            Bracket::Single(i) => (self.secondary[i].lower_bound(), self.secondary[i].upper_bound()),
            Bracket::Between(i) => {
                let bin = self.bin(i, x);
                match self.policy {
                    TwoDGridPolicy::Direct(_) => bin.envelope(),
                    _ => bin.limits(),
                }
            }
        })
    }

    /// Lower limit of the secondary variable at primary value `x`.
    pub fn lower_bound_of_secondary_conditional_indep_var(
        &self,
        x: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        Ok(self.secondary_limits(x, mode)?.0)
    }

    /// Upper limit of the secondary variable at primary value `x`.
    pub fn upper_bound_of_secondary_conditional_indep_var(
        &self,
        x: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        Ok(self.secondary_limits(x, mode)?.1)
    }

    fn evaluate_with(
        &self,
        x: f64,
        y: f64,
        mode: PrimaryLimitMode,
        eval: impl Fn(&D, f64) -> f64,
    ) -> Result<f64, DomainError> {
        Ok(match self.bracket(x, mode)? {
            Bracket::Single(i) => eval(&*self.secondary[i], y),
            Bracket::Between(i) => {
                let bin = self.bin(i, x);
                match self.policy {
                    TwoDGridPolicy::Direct(_) => bin.direct(y, eval),
                    _ => bin.unit_base(y, &bin.intermediate(), bin.limits(), eval),
                }
            }
        })
    }

    /// Evaluate with caller-supplied secondary limits at `x`.
    ///
    /// On a boundary the limits are mapped onto that boundary's own range.
    fn evaluate_in_limits_with(
        &self,
        x: f64,
        y: f64,
        (min, max): (f64, f64),
        mode: PrimaryLimitMode,
        eval: impl Fn(&D, f64) -> f64,
    ) -> Result<f64, DomainError> {
        if y.is_nan() || y < min || y > max {
            return Ok(0.0);
        }
        Ok(match self.bracket(x, mode)? {
            Bracket::Single(i) => {
                let d = &*self.secondary[i];
                let axis = self
                    .policy
                    .interp()
                    .unwrap_or_default()
                    .secondary
                    .or_lin(&[min, d.lower_bound()]);
                let eta = UnitBase::new(axis, min, max).eta(y).clamp(0.0, 1.0);
                let mapped = UnitBase::new(axis, d.lower_bound(), d.upper_bound())
                    .value(eta)
                    .min(d.upper_bound());
                eval(d, mapped)
            }
            Bracket::Between(i) => {
                let bin = self.bin(i, x).accepting(min);
                bin.unit_base(y, &bin.supplied(min, max), (min, max), eval)
            }
        })
    }

    /// Unnormalised value of the table at `(x, y)`.
    pub fn evaluate(&self, x: f64, y: f64, mode: PrimaryLimitMode) -> Result<f64, DomainError> {
        self.evaluate_with(x, y, mode, |d, y| d.evaluate(y))
    }

    /// Normalised density of the secondary variable given `x`.
    pub fn evaluate_secondary_conditional_pdf(
        &self,
        x: f64,
        y: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        self.evaluate_with(x, y, mode, |d, y| d.evaluate_pdf(y))
    }

    /// Density of the secondary variable given `x`, consistent with
    /// correlated sampling for the correlated policies.
    ///
    /// Identical to
    /// [`evaluate_secondary_conditional_pdf`](Self::evaluate_secondary_conditional_pdf)
    /// for the other policies.
    pub fn evaluate_secondary_conditional_pdf_exact(
        &self,
        x: f64,
        y: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        if let (true, Bracket::Between(i)) = (self.policy.is_correlated(), self.bracket(x, mode)?) {
            let bin = self.bin(i, x);
            if let (Some(t0), Some(t1)) = (bin.lower.as_tabular(), bin.upper.as_tabular()) {
                return Ok(bin.correlated_pdf(t0, t1, y));
            }
        }
        self.evaluate_secondary_conditional_pdf(x, y, mode)
    }

    /// Unnormalised value at `(x, y)` on an intermediate grid spanning
    /// `[min_y, max_y]`.
    pub fn correlated_evaluate(
        &self,
        x: f64,
        y: f64,
        min_y: f64,
        max_y: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        self.evaluate_in_limits_with(x, y, (min_y, max_y), mode, |d, y| d.evaluate(y))
    }

    /// Secondary density given `x` on an intermediate grid spanning
    /// `[min_y, max_y]`.
    pub fn correlated_evaluate_secondary_conditional_pdf(
        &self,
        x: f64,
        y: f64,
        min_y: f64,
        max_y: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        self.evaluate_in_limits_with(x, y, (min_y, max_y), mode, |d, y| d.evaluate_pdf(y))
    }
}

impl FullyTabularTwoDDistribution {
    fn cdf_with(
        &self,
        x: f64,
        y: f64,
        mode: PrimaryLimitMode,
        limits: Option<(f64, f64)>,
    ) -> Result<f64, DomainError> {
        Ok(match self.bracket(x, mode)? {
            Bracket::Single(i) => match limits {
                None => self.secondary[i].evaluate_cdf(y),
                Some((min, max)) => {
                    if y.is_nan() || y < min {
                        return Ok(0.0);
                    }
                    if y > max {
                        return Ok(1.0);
                    }
                    let d = &*self.secondary[i];
                    let axis = self
                        .policy
                        .interp()
                        .unwrap_or_default()
                        .secondary
                        .or_lin(&[min, d.lower_bound()]);
                    let eta = UnitBase::new(axis, min, max).eta(y).clamp(0.0, 1.0);
                    let mapped = UnitBase::new(axis, d.lower_bound(), d.upper_bound())
                        .value(eta)
                        .min(d.upper_bound());
                    d.evaluate_cdf(mapped)
                }
            },
            Bracket::Between(i) => {
                let bin = self.bin(i, x);
                match (self.policy, limits) {
                    (TwoDGridPolicy::Direct(_), None) => bin.direct(y, |d, y| d.evaluate_cdf(y)),
                    (_, None) => bin.unit_base_cdf(y, &bin.intermediate(), bin.limits(), |d, y| {
                        d.evaluate_cdf(y)
                    }),
                    (_, Some((min, max))) => {
                        let bin = bin.accepting(min);
                        bin.unit_base_cdf(y, &bin.supplied(min, max), (min, max), |d, y| {
                            d.evaluate_cdf(y)
                        })
                    }
                }
            }
        })
    }

    /// Cumulative distribution of the secondary variable given `x`.
    pub fn evaluate_secondary_conditional_cdf(
        &self,
        x: f64,
        y: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        self.cdf_with(x, y, mode, None)
    }

    /// Cumulative distribution consistent with correlated sampling for the
    /// correlated policies.
    ///
    /// Found by bisection on the shared random number.
    pub fn evaluate_secondary_conditional_cdf_exact(
        &self,
        x: f64,
        y: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        if let (true, Bracket::Between(i)) = (self.policy.is_correlated(), self.bracket(x, mode)?) {
            let bin = self.bin(i, x);
            return Ok(bin.correlated_cdf(bin.lower, bin.upper, y));
        }
        self.evaluate_secondary_conditional_cdf(x, y, mode)
    }

    /// Cumulative distribution given `x` on an intermediate grid spanning
    /// `[min_y, max_y]`.
    pub fn correlated_evaluate_secondary_conditional_cdf(
        &self,
        x: f64,
        y: f64,
        min_y: f64,
        max_y: f64,
        mode: PrimaryLimitMode,
    ) -> Result<f64, DomainError> {
        self.cdf_with(x, y, mode, Some((min_y, max_y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        exponential_table, histogram_table, repeated_grid_table, two_uniforms, uniform,
    };
    use crate::interp::TwoDInterpPolicy;
    use phasespace_univariate::{Exponential, Uniform};

    const LIMIT: PrimaryLimitMode = PrimaryLimitMode::Limit;
    const EXTEND: PrimaryLimitMode = PrimaryLimitMode::Extend;

    fn assert_close(actual: Result<f64, DomainError>, expected: f64, tol: f64) {
        let actual = actual.unwrap();
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn rejects_malformed_grids() {
        let two = || vec![uniform(0.0, 1.0, 1.0), uniform(0.0, 1.0, 1.0)];
        let hist = TwoDGridPolicy::Histogram;
        let build = |grid: Vec<f64>, dists, policy| {
            FullyTabularTwoDDistribution::fully_tabular(grid, dists, policy)
        };
        assert!(build(vec![0.0], vec![uniform(0.0, 1.0, 1.0)], hist).is_err());
        assert!(build(vec![0.0, 1.0, 2.0], two(), hist).is_err());
        assert!(build(vec![1.0, 0.0], two(), hist).is_err());
        assert!(build(vec![0.0, f64::NAN], two(), hist).is_err());
        assert!(build(vec![1.0, 1.0], two(), hist).is_err());
        let log_primary = TwoDGridPolicy::UnitBase(TwoDInterpPolicy::LIN_LIN_LOG);
        assert!(build(vec![0.0, 1.0], two(), log_primary).is_err());
        assert!(build(vec![0.5, 1.0], two(), log_primary).is_ok());
    }

    #[test]
    fn partially_tabular_rejects_correlated_policies() {
        let dists = || -> Vec<Arc<dyn UnivariateDistribution>> {
            vec![
                Arc::new(Exponential::new(1.0, 1.0, 0.0, 1.0).unwrap()),
                Arc::new(Uniform::new(0.0, 1.0, 1.0).unwrap()),
            ]
        };
        for policy in [
            TwoDGridPolicy::Correlated(TwoDInterpPolicy::LIN_LIN_LIN),
            TwoDGridPolicy::UnitBaseCorrelated(TwoDInterpPolicy::LIN_LIN_LIN),
        ] {
            let err = PartiallyTabularTwoDDistribution::partially_tabular(
                vec![0.0, 1.0],
                dists(),
                policy,
            )
            .unwrap_err();
            assert!(err.to_string().contains("tabular"));
        }
        assert!(PartiallyTabularTwoDDistribution::partially_tabular(
            vec![0.0, 1.0],
            dists(),
            TwoDGridPolicy::UnitBase(TwoDInterpPolicy::LIN_LIN_LIN),
        )
        .is_ok());
    }

    #[test]
    fn boundary_uses_its_own_distribution() {
        let t = histogram_table();
        assert_eq!(t.evaluate(0.1, 0.5, LIMIT), Ok(0.5));
        assert_close(t.evaluate_secondary_conditional_pdf(0.1, 0.5, LIMIT), 2.5, 1e-12);
        assert_eq!(t.evaluate(0.5, 0.7, LIMIT), Ok(0.4));
        assert_eq!(t.evaluate(0.5, 0.55, LIMIT), Ok(0.0));
        assert_eq!(t.evaluate_secondary_conditional_cdf(0.1, 0.5, LIMIT), Ok(0.0));
    }

    #[test]
    fn histogram_bin_uses_lower_boundary() {
        let t = histogram_table();
        assert_eq!(t.evaluate(0.3, 0.5, LIMIT), Ok(0.5));
        assert_close(t.evaluate_secondary_conditional_pdf(0.3, 0.5, LIMIT), 2.5, 1e-12);
        assert_close(t.evaluate_secondary_conditional_cdf(0.3, 0.7, LIMIT), 0.5, 1e-12);
        // The last grid point closes the last bin.
        assert_eq!(t.evaluate(0.9, 0.7, LIMIT), Ok(0.4));
    }

    #[test]
    fn limit_mode_errors_and_extend_mode_clamps() {
        let t = histogram_table();
        assert_eq!(
            t.evaluate(0.05, 0.5, LIMIT),
            Err(DomainError::PrimaryOutOfRange {
                value: 0.05,
                lower: 0.1,
                upper: 0.9,
            })
        );
        assert!(t.evaluate(1.0, 0.7, LIMIT).is_err());
        assert_eq!(t.evaluate(0.05, 0.5, EXTEND), Ok(0.5));
        assert_eq!(t.evaluate(1.0, 0.7, EXTEND), Ok(0.4));
        // Switching back restores the limit behaviour.
        assert!(t.evaluate(0.05, 0.5, LIMIT).is_err());
        assert!(t
            .lower_bound_of_secondary_conditional_indep_var(1.0, LIMIT)
            .is_err());
        assert_eq!(
            t.lower_bound_of_secondary_conditional_indep_var(1.0, EXTEND),
            Ok(0.6)
        );
        assert!(t.evaluate(f64::NAN, 0.5, LIMIT).is_err());
    }

    #[test]
    fn repeated_grid_point_belongs_to_later_copy() {
        let t = repeated_grid_table();
        assert_eq!(t.primary_bin_index(0.0, LIMIT), Ok(1));
        assert_eq!(t.primary_bin_index(0.5, LIMIT), Ok(1));
        assert_eq!(t.primary_bin_index(1.0, LIMIT), Ok(2));
        assert_eq!(t.primary_bin_index(2.0, LIMIT), Ok(2));
        assert_eq!(t.primary_bin_index(3.0, EXTEND), Ok(3));
        assert_eq!(t.primary_bin_index(-1.0, EXTEND), Ok(0));
        assert!(t.primary_bin_index(3.0, LIMIT).is_err());
        assert_close(t.evaluate_secondary_conditional_pdf(0.0, 5.0, LIMIT), 0.1, 1e-15);
    }

    #[test]
    fn secondary_bounds_follow_the_policy() {
        let t = histogram_table();
        assert_eq!(t.lower_bound_of_secondary_conditional_indep_var(0.3, LIMIT), Ok(0.5));
        assert_eq!(t.upper_bound_of_secondary_conditional_indep_var(0.3, LIMIT), Ok(0.9));

        let direct = two_uniforms(TwoDGridPolicy::Direct(TwoDInterpPolicy::LIN_LIN_LIN));
        assert_eq!(direct.lower_bound_of_secondary_conditional_indep_var(0.5, LIMIT), Ok(0.0));
        assert_eq!(direct.upper_bound_of_secondary_conditional_indep_var(0.5, LIMIT), Ok(3.0));

        let unit = two_uniforms(TwoDGridPolicy::UnitBase(TwoDInterpPolicy::LIN_LIN_LIN));
        assert_close(unit.lower_bound_of_secondary_conditional_indep_var(0.5, LIMIT), 0.5, 1e-15);
        assert_close(unit.upper_bound_of_secondary_conditional_indep_var(0.5, LIMIT), 2.0, 1e-15);
        assert_eq!(unit.upper_bound_of_secondary_conditional_indep_var(1.0, LIMIT), Ok(3.0));
    }

    #[test]
    fn direct_interpolates_at_the_same_coordinate() {
        let t = two_uniforms(TwoDGridPolicy::Direct(TwoDInterpPolicy::LIN_LIN_LIN));
        assert_close(t.evaluate_secondary_conditional_pdf(0.5, 1.0, LIMIT), 0.75, 1e-15);
        assert_close(t.evaluate_secondary_conditional_pdf(0.5, 0.5, LIMIT), 0.5, 1e-15);
        assert_close(t.evaluate_secondary_conditional_cdf(0.5, 1.0, LIMIT), 0.5, 1e-15);
    }

    #[test]
    fn unit_base_preserves_interpolated_limits() {
        let t = two_uniforms(TwoDGridPolicy::UnitBase(TwoDInterpPolicy::LIN_LIN_LIN));
        assert_close(t.evaluate_secondary_conditional_pdf(0.5, 1.0, LIMIT), 2.0 / 3.0, 1e-12);
        assert_close(t.evaluate_secondary_conditional_pdf(0.5, 1.9, LIMIT), 2.0 / 3.0, 1e-12);
        assert_eq!(t.evaluate_secondary_conditional_pdf(0.5, 0.4, LIMIT), Ok(0.0));
        assert_eq!(t.evaluate_secondary_conditional_pdf(0.5, 2.1, LIMIT), Ok(0.0));
        assert_close(t.evaluate_secondary_conditional_cdf(0.5, 1.25, LIMIT), 0.5, 1e-12);
        assert_eq!(t.evaluate_secondary_conditional_cdf(0.5, 0.1, LIMIT), Ok(0.0));
        assert_eq!(t.evaluate_secondary_conditional_cdf(0.5, 2.5, LIMIT), Ok(1.0));
        // Without correlation the exact forms are the plain ones.
        assert_eq!(
            t.evaluate_secondary_conditional_pdf_exact(0.5, 1.0, LIMIT),
            t.evaluate_secondary_conditional_pdf(0.5, 1.0, LIMIT)
        );
    }

    #[test]
    fn exact_correlated_cdf_and_pdf() {
        for policy in [
            TwoDGridPolicy::Correlated(TwoDInterpPolicy::LIN_LIN_LIN),
            TwoDGridPolicy::UnitBaseCorrelated(TwoDInterpPolicy::LIN_LIN_LIN),
        ] {
            let t = two_uniforms(policy);
            assert_close(t.evaluate_secondary_conditional_cdf_exact(0.5, 1.25, LIMIT), 0.5, 1e-10);
            assert_close(t.evaluate_secondary_conditional_cdf_exact(0.5, 0.875, LIMIT), 0.25, 1e-10);
            assert_close(
                t.evaluate_secondary_conditional_pdf_exact(0.5, 1.25, LIMIT),
                2.0 / 3.0,
                1e-9,
            );
            assert_eq!(t.evaluate_secondary_conditional_cdf_exact(0.5, 0.5, LIMIT), Ok(0.0));
            assert_eq!(t.evaluate_secondary_conditional_cdf_exact(0.5, 2.0, LIMIT), Ok(1.0));
            assert_eq!(t.evaluate_secondary_conditional_pdf_exact(0.5, 2.5, LIMIT), Ok(0.0));
            // On a boundary the boundary's own CDF is exact.
            assert_close(t.evaluate_secondary_conditional_cdf_exact(1.0, 2.0, LIMIT), 0.5, 1e-15);
        }
    }

    #[test]
    fn correlated_evaluation_in_supplied_limits() {
        let t = two_uniforms(TwoDGridPolicy::UnitBase(TwoDInterpPolicy::LIN_LIN_LIN));
        assert_close(t.correlated_evaluate(0.5, 1.0, 0.0, 3.0, LIMIT), 1.0 / 3.0, 1e-12);
        assert_eq!(t.correlated_evaluate(0.5, 3.5, 0.0, 3.0, LIMIT), Ok(0.0));
        // On a boundary the supplied limits map onto the boundary's range.
        assert_eq!(t.correlated_evaluate(0.0, 1.0, 0.0, 2.0, LIMIT), Ok(1.0));
        assert_close(
            t.correlated_evaluate_secondary_conditional_pdf(0.0, 1.0, 0.0, 2.0, LIMIT),
            1.0,
            1e-15,
        );
        assert_close(
            t.correlated_evaluate_secondary_conditional_cdf(0.0, 1.0, 0.0, 2.0, LIMIT),
            0.5,
            1e-15,
        );
        assert_eq!(
            t.correlated_evaluate_secondary_conditional_cdf(0.5, 5.0, 0.0, 3.0, LIMIT),
            Ok(1.0)
        );
    }

    #[test]
    fn partially_tabular_evaluates_non_tabular_secondaries() {
        let t = exponential_table();
        let expected = (-0.6f64).exp() / ((-0.6f64).exp() - (-0.8f64).exp());
        assert_close(t.evaluate_secondary_conditional_pdf(0.5, 0.6, LIMIT), expected, 1e-12);
        assert_close(t.evaluate(0.7, 0.6, LIMIT), (-0.6f64).exp(), 1e-15);
        assert!(t.has_same_primary_bounds(&histogram_table()));
        assert!(!t.has_same_primary_bounds(&two_uniforms(TwoDGridPolicy::Histogram)));
        assert_eq!(t.lower_bound_of_primary_indep_var(), 0.1);
        assert_eq!(t.upper_bound_of_primary_indep_var(), 0.9);
        assert!(t.is_primary_dimension_tabular());
        assert!(t.is_primary_dimension_continuous());
    }
}
