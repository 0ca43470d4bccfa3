//! Uniform random-number sources consumed by every sampler.
//!
//! Samplers take `&mut dyn RandomNumberGenerator` so production code can
//! use a seeded [`StreamRng`] while tests inject a [`ReplayRng`] with a
//! fixed draw sequence.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A source of canonical random numbers in `[0, 1)`.
pub trait RandomNumberGenerator {
    /// Draw the next uniform random number in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

impl<R: RandomNumberGenerator + ?Sized> RandomNumberGenerator for &mut R {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// Deterministic ChaCha8 stream, one independent stream per history.
#[derive(Clone, Debug)]
pub struct StreamRng {
    inner: ChaCha8Rng,
}

impl StreamRng {
    /// Stream 0 of the generator seeded with `seed`.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The stream dedicated to `history` under `seed`.
    ///
    /// Two calls with the same arguments produce the same sequence no
    /// matter which thread samples the history.
    pub fn for_history(seed: u64, history: u64) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(seed);
        inner.set_stream(history);
        Self { inner }
    }
}

impl RandomNumberGenerator for StreamRng {
    fn next_uniform(&mut self) -> f64 {
        self.inner.random::<f64>()
    }
}

/// Replays a fixed sequence of random numbers, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct ReplayRng {
    values: Vec<f64>,
    next: usize,
    draws: u64,
}

impl ReplayRng {
    /// Create a replay stream.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty or any value lies outside `[0, 1)`.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "ReplayRng needs at least one value");
        assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "ReplayRng values must lie in [0, 1), got {values:?}"
        );
        Self {
            values,
            next: 0,
            draws: 0,
        }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Restart the sequence from its first value.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl RandomNumberGenerator for ReplayRng {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.next];
        self.next = (self.next + 1) % self.values.len();
        self.draws += 1;
        value
    }
}
