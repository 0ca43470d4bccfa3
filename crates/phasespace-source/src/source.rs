//! The parallel per-history source driver.
//!
//! History `h` always draws from `StreamRng::for_history(seed, h)`, so a
//! run's particles do not depend on the number of workers or on which
//! worker sampled which history. Workers take histories in strides,
//! accumulate a private report, and send it over a channel once done; the
//! calling thread merges the reports and orders the results by history.

use crate::config::{SourceConfig, SourceConfigError};
use crate::distribution::{SourceParticle, StandardParticleDistribution};
use crate::metrics::SamplingMetrics;
use phasespace_core::{DomainError, PhaseSpacePoint, StreamRng};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::thread;

// ── Results ────────────────────────────────────────────────────────

/// An accepted history.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledHistory {
    /// History index.
    pub history: u64,
    /// The accepted point.
    pub point: PhaseSpacePoint,
    /// Samples rejected before this one was accepted.
    pub rejections: u32,
}

impl SampledHistory {
    /// The accepted point as a particle.
    pub fn particle(&self) -> SourceParticle {
        SourceParticle::from_point(&self.point)
    }
}

/// Why a history produced no particle.
#[derive(Clone, Debug, PartialEq)]
pub enum HistoryError {
    /// Sampling failed.
    Domain(DomainError),
    /// Every allowed attempt was rejected by the acceptance predicate.
    ResampleLimit {
        /// Samples drawn and rejected.
        attempts: u32,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "sampling failed: {e}"),
            Self::ResampleLimit { attempts } => {
                write!(f, "all {attempts} samples were rejected")
            }
        }
    }
}

impl Error for HistoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::ResampleLimit { .. } => None,
        }
    }
}

impl From<DomainError> for HistoryError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

/// A history that produced no particle.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryFailure {
    /// History index.
    pub history: u64,
    /// What went wrong.
    pub error: HistoryError,
}

impl fmt::Display for HistoryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "history {}: {}", self.history, self.error)
    }
}

impl Error for HistoryFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Everything a run produced, ordered by history index.
#[derive(Clone, Debug, Default)]
pub struct SourceRun {
    /// Accepted histories.
    pub histories: Vec<SampledHistory>,
    /// Failed histories.
    pub failures: Vec<HistoryFailure>,
    /// Merged metrics of every worker.
    pub metrics: SamplingMetrics,
}

#[derive(Default)]
struct WorkerReport {
    histories: Vec<SampledHistory>,
    failures: Vec<HistoryFailure>,
    metrics: SamplingMetrics,
}

// ── ParticleSource ─────────────────────────────────────────────────

/// Samples many histories from one [`StandardParticleDistribution`].
#[derive(Debug)]
pub struct ParticleSource {
    distribution: Arc<StandardParticleDistribution>,
    config: SourceConfig,
}

impl ParticleSource {
    /// Create a source after validating `config`.
    pub fn new(
        distribution: Arc<StandardParticleDistribution>,
        config: SourceConfig,
    ) -> Result<Self, SourceConfigError> {
        config.validate()?;
        Ok(Self {
            distribution,
            config,
        })
    }

    /// The sampled distribution.
    pub fn distribution(&self) -> &Arc<StandardParticleDistribution> {
        &self.distribution
    }

    /// The run configuration.
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Sample one history on the calling thread, accepting every point.
    ///
    /// Produces the same point a full [`run`](Self::run) produces for
    /// `history`.
    pub fn sample_history(&self, history: u64) -> Result<SampledHistory, HistoryError> {
        self.sample_one(history, &|_: &PhaseSpacePoint| true, &mut SamplingMetrics::default())
    }

    /// Sample every configured history, accepting every point.
    pub fn run(&self) -> Result<SourceRun, SourceConfigError> {
        self.run_with_acceptance(|_| true)
    }

    /// Sample every configured history, drawing again while `accept`
    /// rejects the point, up to
    /// [`max_resamples`](SourceConfig::max_resamples) times per history.
    ///
    /// Domain errors end only the affected history; they are reported in
    /// [`SourceRun::failures`] with the history index.
    pub fn run_with_acceptance<F>(&self, accept: F) -> Result<SourceRun, SourceConfigError>
    where
        F: Fn(&PhaseSpacePoint) -> bool + Sync,
    {
        let workers = self.config.resolved_worker_count();
        let (report_tx, report_rx) = crossbeam_channel::bounded::<WorkerReport>(workers);
        let accept = &accept;

        thread::scope(|scope| -> Result<(), SourceConfigError> {
            for worker in 0..workers {
                let report_tx = report_tx.clone();
                thread::Builder::new()
                    .name(format!("phasespace-source-{worker}"))
                    .spawn_scoped(scope, move || {
                        let report = self.sample_stride(worker as u64, workers, accept);
                        // The receiver outlives the scope.
                        let _ = report_tx.send(report);
                    })
                    .map_err(|e| SourceConfigError::ThreadSpawnFailed {
                        reason: format!("sampling worker {worker}: {e}"),
                    })?;
            }
            Ok(())
        })?;
        drop(report_tx);

        let mut run = SourceRun::default();
        for report in report_rx.iter() {
            run.metrics.merge(&report.metrics);
            run.histories.extend(report.histories);
            run.failures.extend(report.failures);
        }
        run.histories.sort_by_key(|h| h.history);
        run.failures.sort_by_key(|f| f.history);

        if !run.failures.is_empty() {
            eprintln!(
                "phasespace-source: warning: {} of {} histories produced no particle",
                run.failures.len(),
                run.metrics.histories
            );
        }
        Ok(run)
    }

    fn sample_stride<F>(&self, first: u64, stride: usize, accept: &F) -> WorkerReport
    where
        F: Fn(&PhaseSpacePoint) -> bool,
    {
        let mut report = WorkerReport::default();
        for history in (first..self.config.histories).step_by(stride) {
            match self.sample_one(history, accept, &mut report.metrics) {
                Ok(sampled) => report.histories.push(sampled),
                Err(error) => {
                    report.metrics.failures += 1;
                    report.failures.push(HistoryFailure { history, error });
                }
            }
        }
        report
    }

    fn sample_one<F>(
        &self,
        history: u64,
        accept: &F,
        metrics: &mut SamplingMetrics,
    ) -> Result<SampledHistory, HistoryError>
    where
        F: Fn(&PhaseSpacePoint) -> bool + ?Sized,
    {
        let mut rng = StreamRng::for_history(self.config.seed, history);
        metrics.histories += 1;
        let mut rejections = 0;
        loop {
            let point = self
                .distribution
                .sample_and_record_trials(&mut rng, &mut metrics.trials)?;
            if accept(&point) {
                metrics.total_weight += point.weight_of_coordinates();
                return Ok(SampledHistory {
                    history,
                    point,
                    rejections,
                });
            }
            metrics.rejections += 1;
            if rejections == self.config.max_resamples {
                return Err(HistoryError::ResampleLimit {
                    attempts: rejections + 1,
                });
            }
            rejections += 1;
        }
    }
}
