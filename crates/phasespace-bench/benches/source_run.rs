//! End-to-end benchmark: a full parallel source run.

use criterion::{criterion_group, criterion_main, Criterion};
use phasespace_bench::{reference_config, reference_distribution};
use phasespace_bivariate::{TwoDGridPolicy, TwoDInterpPolicy};
use phasespace_core::PhaseSpaceDimension;
use phasespace_source::{ParticleSource, SourceConfig};
use std::hint::black_box;
use std::sync::Arc;

/// Benchmark: 10K histories on 1 and 4 workers.
fn bench_run_10k(c: &mut Criterion) {
    let dist = Arc::new(
        reference_distribution(64, TwoDGridPolicy::Correlated(TwoDInterpPolicy::LIN_LIN_LIN))
            .unwrap(),
    );
    let mut group = c.benchmark_group("source_run_10k");
    group.sample_size(20);
    for workers in [1usize, 4] {
        let config = SourceConfig {
            worker_count: Some(workers),
            ..reference_config(42, 10_000)
        };
        let source = ParticleSource::new(Arc::clone(&dist), config).unwrap();
        group.bench_function(format!("{workers}_workers"), |b| {
            b.iter(|| {
                let run = source.run().unwrap();
                black_box(run.metrics.total_weight);
            });
        });
    }
    group.finish();
}

/// Benchmark: 10K histories keeping only the lower half of the time range.
fn bench_run_with_acceptance_10k(c: &mut Criterion) {
    let dist = Arc::new(reference_distribution(64, TwoDGridPolicy::Histogram).unwrap());
    let source = ParticleSource::new(dist, reference_config(42, 10_000)).unwrap();

    let mut group = c.benchmark_group("source_run_with_acceptance_10k");
    group.sample_size(20);
    group.bench_function("lower_half", |b| {
        b.iter(|| {
            let run = source
                .run_with_acceptance(|p| p.coordinate(PhaseSpaceDimension::Time) < 33.0)
                .unwrap();
            black_box(run.metrics.rejections);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_run_10k, bench_run_with_acceptance_10k);
criterion_main!(benches);
