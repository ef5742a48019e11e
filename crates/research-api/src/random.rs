//! Injectable randomness for latency, token counts and confidence scores

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Source of the cosmetic random values in a response
///
/// Implementations:
/// - `ThreadRandom`: thread-local RNG, used in production
/// - `SeededRandom`: reproducible sequence for tests
pub trait RandomSource: Send + Sync {
    /// Uniform integer in the inclusive range
    fn int_in(&self, range: RangeInclusive<u64>) -> u64;

    /// Uniform float in the inclusive range
    fn float_in(&self, range: RangeInclusive<f64>) -> f64;
}

/// Thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn int_in(&self, range: RangeInclusive<u64>) -> u64 {
        rand::thread_rng().gen_range(range)
    }

    fn float_in(&self, range: RangeInclusive<f64>) -> f64 {
        rand::thread_rng().gen_range(range)
    }
}

/// Deterministic RNG seeded once
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Create from a fixed seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn int_in(&self, range: RangeInclusive<u64>) -> u64 {
        self.rng.lock().gen_range(range)
    }

    fn float_in(&self, range: RangeInclusive<f64>) -> f64 {
        self.rng.lock().gen_range(range)
    }
}
