//! Key/value persistence interface.
//!
//! The contract mirrors browser local storage: string keys, string values,
//! synchronous `get` / `set` / `remove`. Handlers report failures through
//! `PersistenceError`; callers normally go through `SessionStore`, which turns
//! any failure into degraded in-memory operation.

use std::sync::Arc;
use thiserror::Error;

/// Error type for persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The backend cannot be used at all (disabled, quota exhausted, permissions).
    #[error("Storage unavailable: {reason}")]
    Unavailable {
        /// Why the backend is unavailable
        reason: String,
    },

    /// A single read failed.
    #[error("Read failed for key {key}: {reason}")]
    ReadFailed {
        /// Key being read
        key: String,
        /// Failure detail
        reason: String,
    },

    /// A single write failed.
    #[error("Write failed for key {key}: {reason}")]
    WriteFailed {
        /// Key being written
        key: String,
        /// Failure detail
        reason: String,
    },
}

impl PersistenceError {
    /// Create an unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create a read failure.
    pub fn read_failed(key: &str, reason: impl Into<String>) -> Self {
        Self::ReadFailed {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a write failure.
    pub fn write_failed(key: &str, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Durable string key/value storage.
pub trait PersistenceEffects: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError>;

    /// Remove `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool, PersistenceError>;
}

/// Blanket implementation for Arc<T> where T: PersistenceEffects
impl<T: PersistenceEffects + ?Sized> PersistenceEffects for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, PersistenceError> {
        (**self).remove(key)
    }
}
