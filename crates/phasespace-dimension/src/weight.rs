//! Importance-sampling weights.

use phasespace_core::{DomainError, PhaseSpaceDimension};

/// Weight of a value drawn from the importance density instead of the
/// true density.
///
/// - Both densities positive: `true / importance`.
/// - True density zero: weight 0, with a warning.
/// - Importance density zero: [`DomainError::InfiniteWeight`] unless the
///   true density is zero too, in which case the weight is 1 with a
///   warning.
pub(crate) fn importance_weight(
    dimension: PhaseSpaceDimension,
    value: f64,
    true_density: f64,
    importance_density: f64,
) -> Result<f64, DomainError> {
    if importance_density > 0.0 {
        let weight = true_density / importance_density;
        if weight == 0.0 {
            eprintln!(
                "phasespace-dimension: warning: {dimension} value {value} has zero true \
                 density; its sample weight is 0"
            );
        }
        return Ok(weight);
    }
    if true_density > 0.0 {
        return Err(DomainError::InfiniteWeight { dimension, value });
    }
    eprintln!(
        "phasespace-dimension: warning: {dimension} value {value} has zero true and \
         importance density; its sample weight is 1"
    );
    Ok(1.0)
}

/// Weight of a value forced onto a plain node: its probability density.
pub(crate) fn forced_weight(
    dimension: PhaseSpaceDimension,
    value: f64,
    density: f64,
) -> Result<f64, DomainError> {
    if density > 0.0 && density.is_finite() {
        Ok(density)
    } else {
        Err(DomainError::ZeroDensity { dimension, value })
    }
}
