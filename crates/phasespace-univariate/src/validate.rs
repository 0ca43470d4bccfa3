//! Shared parameter checks for distribution constructors.

use phasespace_core::ConfigurationError;

pub(crate) fn require(
    distribution: &'static str,
    ok: bool,
    reason: impl FnOnce() -> String,
) -> Result<(), ConfigurationError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidDistribution {
            distribution,
            reason: reason(),
        })
    }
}

pub(crate) fn require_finite(
    distribution: &'static str,
    name: &str,
    value: f64,
) -> Result<(), ConfigurationError> {
    require(distribution, value.is_finite(), || {
        format!("{name} must be finite, got {value}")
    })
}
