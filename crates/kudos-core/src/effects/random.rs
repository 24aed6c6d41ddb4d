//! Randomness interface.
//!
//! Not a security primitive: Kudos only needs enough entropy to keep session
//! tokens from colliding and to vary challenge operands.

use std::sync::Arc;

/// Source of non-cryptographic randomness.
pub trait RandomEffects: Send + Sync {
    /// Uniformly distributed `u64`.
    fn random_u64(&self) -> u64;

    /// Uniform value in the inclusive range `[min, max]`. Returns `min` when
    /// the range is empty.
    fn random_range(&self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        let span = max - min;
        if span == u64::MAX {
            return self.random_u64();
        }
        min + self.random_u64() % (span + 1)
    }
}

impl<T: RandomEffects + ?Sized> RandomEffects for Arc<T> {
    fn random_u64(&self) -> u64 {
        (**self).random_u64()
    }

    fn random_range(&self, min: u64, max: u64) -> u64 {
        (**self).random_range(min, max)
    }
}
