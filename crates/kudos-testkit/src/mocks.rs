//! Mock effect handlers
//!
//! `FailingPersistence` and `FlakyPersistence` exercise the degraded-mode
//! path of `SessionStore`; `FixedRandom` pins generated identities and
//! challenge operands.

use kudos_core::effects::{PersistenceEffects, PersistenceError, RandomEffects};
use kudos_effects::MemoryPersistenceHandler;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Persistence handler whose every operation fails.
#[derive(Debug, Clone, Default)]
pub struct FailingPersistence {
    calls: Arc<AtomicUsize>,
}

impl FailingPersistence {
    /// Create a failing handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations attempted against the handler.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> PersistenceError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PersistenceError::unavailable("storage disabled")
    }
}

impl PersistenceEffects for FailingPersistence {
    fn get(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
        Err(self.fail())
    }

    fn set(&self, key: &str, _value: String) -> Result<(), PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(PersistenceError::write_failed(key, "quota exceeded"))
    }

    fn remove(&self, _key: &str) -> Result<bool, PersistenceError> {
        Err(self.fail())
    }
}

/// In-memory handler that starts failing after a number of successful
/// operations, as when a browser quota fills up mid-session.
#[derive(Debug, Clone)]
pub struct FlakyPersistence {
    inner: MemoryPersistenceHandler,
    remaining: Arc<AtomicUsize>,
}

impl FlakyPersistence {
    /// Allow `successes` operations before failing.
    pub fn fail_after(successes: usize) -> Self {
        Self::with_inner(MemoryPersistenceHandler::new(), successes)
    }

    /// Wrap an existing memory handler.
    pub fn with_inner(inner: MemoryPersistenceHandler, successes: usize) -> Self {
        Self {
            inner,
            remaining: Arc::new(AtomicUsize::new(successes)),
        }
    }

    /// The wrapped handler, holding whatever was written before the failure.
    pub fn inner(&self) -> &MemoryPersistenceHandler {
        &self.inner
    }

    fn admit(&self, key: &str) -> Result<(), PersistenceError> {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map(|_| ())
            .map_err(|_| PersistenceError::read_failed(key, "backend went away"))
    }
}

impl PersistenceEffects for FlakyPersistence {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.admit(key)?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.admit(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, PersistenceError> {
        self.admit(key)?;
        self.inner.remove(key)
    }
}

/// Random source returning a fixed value, or a fixed sequence.
#[derive(Debug, Clone)]
pub struct FixedRandom {
    values: Arc<Vec<u64>>,
    cursor: Arc<AtomicU64>,
}

impl FixedRandom {
    /// Always return `value`.
    pub fn new(value: u64) -> Self {
        Self::sequence([value])
    }

    /// Cycle through `values`. An empty sequence yields zeros.
    pub fn sequence(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: Arc::new(values.into_iter().collect()),
            cursor: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl RandomEffects for FixedRandom {
    fn random_u64(&self) -> u64 {
        if self.values.is_empty() {
            return 0;
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) as usize % self.values.len();
        self.values[index]
    }
}
