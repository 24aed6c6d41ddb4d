//! Random effect handlers
//!
//! `RealRandomHandler` uses the thread RNG; `SeededRandomHandler` is a
//! deterministic ChaCha stream for tests and simulations.

use kudos_core::effects::RandomEffects;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Real random handler backed by `rand::thread_rng()`.
#[derive(Debug, Clone, Default)]
pub struct RealRandomHandler;

impl RealRandomHandler {
    /// Create a new real random handler
    pub fn new() -> Self {
        Self
    }
}

impl RandomEffects for RealRandomHandler {
    fn random_u64(&self) -> u64 {
        rand::thread_rng().gen()
    }

    fn random_range(&self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Deterministic random handler.
#[derive(Debug)]
pub struct SeededRandomHandler {
    rng: Mutex<ChaCha8Rng>,
}

impl SeededRandomHandler {
    /// Create a handler producing the stream for `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl Default for SeededRandomHandler {
    fn default() -> Self {
        Self::with_seed(42)
    }
}

impl RandomEffects for SeededRandomHandler {
    fn random_u64(&self) -> u64 {
        self.rng.lock().gen()
    }

    fn random_range(&self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        self.rng.lock().gen_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_streams_repeat() {
        let a = SeededRandomHandler::with_seed(7);
        let b = SeededRandomHandler::with_seed(7);
        let left: Vec<u64> = (0..5).map(|_| a.random_u64()).collect();
        let right: Vec<u64> = (0..5).map(|_| b.random_u64()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let real = RealRandomHandler::new();
        let seeded = SeededRandomHandler::default();
        for _ in 0..200 {
            let r = real.random_range(1, 10);
            let s = seeded.random_range(1, 10);
            assert!((1..=10).contains(&r));
            assert!((1..=10).contains(&s));
        }
    }
}
