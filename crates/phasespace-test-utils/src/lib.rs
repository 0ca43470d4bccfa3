//! Test doubles and fixture tables for phasespace development.
//!
//! - [`tables`]: the reference two-dimensional tables used across the
//!   workspace tests.
//! - [`nodes`]: mock dimension nodes with fixed or failing behaviour.
//! - [`ConstantRng`] and [`CountingRng`]: random-number doubles.
//! - [`assert_close`]: relative float comparison.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod nodes;
pub mod tables;

use phasespace_core::RandomNumberGenerator;

/// Returns the same random number forever.
#[derive(Clone, Copy, Debug)]
pub struct ConstantRng(pub f64);

impl RandomNumberGenerator for ConstantRng {
    fn next_uniform(&mut self) -> f64 {
        self.0
    }
}

/// Counts the draws taken from an inner generator.
#[derive(Clone, Debug)]
pub struct CountingRng<R> {
    inner: R,
    draws: u64,
}

impl<R: RandomNumberGenerator> CountingRng<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, draws: 0 }
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: RandomNumberGenerator> RandomNumberGenerator for CountingRng<R> {
    fn next_uniform(&mut self) -> f64 {
        self.draws += 1;
        self.inner.next_uniform()
    }
}

/// Assert `actual` is within `tol` of `expected`, relative to
/// `max(|expected|, 1)`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tol * scale,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}
