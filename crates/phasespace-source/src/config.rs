//! Source run configuration, validation, and error types.

use std::error::Error;
use std::fmt;

// ── SourceConfig ───────────────────────────────────────────────────

/// Configuration for a [`ParticleSource`](crate::ParticleSource) run.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceConfig {
    /// Number of histories to sample. Default: 1000.
    pub histories: u64,
    /// Seed of the per-history random streams. Default: 0.
    pub seed: u64,
    /// Number of sampling threads. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 16]`).
    pub worker_count: Option<usize>,
    /// Resamples allowed after a history is rejected by the acceptance
    /// predicate. Default: 100.
    pub max_resamples: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            histories: 1000,
            seed: 0,
            worker_count: None,
            max_resamples: 100,
        }
    }
}

impl SourceConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), SourceConfigError> {
        if self.histories == 0 {
            return Err(SourceConfigError::NoHistories);
        }
        if self.worker_count == Some(0) {
            return Err(SourceConfigError::NoWorkers);
        }
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`. Never more workers than
    /// histories.
    pub fn resolved_worker_count(&self) -> usize {
        let workers = match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 16),
        };
        let histories = usize::try_from(self.histories).unwrap_or(usize::MAX);
        workers.min(histories.max(1))
    }
}

// ── SourceConfigError ──────────────────────────────────────────────

/// Errors detected by [`SourceConfig::validate`] or while starting a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceConfigError {
    /// `histories` is zero.
    NoHistories,
    /// `worker_count` is `Some(0)`.
    NoWorkers,
    /// A sampling thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for SourceConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHistories => write!(f, "histories must be at least 1"),
            Self::NoWorkers => write!(f, "worker_count must be at least 1"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for SourceConfigError {}
