//! Session-scoped persistence policy
//!
//! `SessionStore` sits between feature components and a `PersistenceEffects`
//! handler and owns two rules:
//!
//! - Malformed records decode to their `Default` value.
//! - The first backend failure switches the store to in-memory-only operation
//!   for the rest of its lifetime. A write-through mirror keeps every value
//!   seen so far, so the switch loses nothing already observed.
//!
//! No method on this type returns an error. Storage trouble is visible only
//! through `is_degraded()` and the logs.

use crate::effects::{PersistenceEffects, PersistenceError};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Persistence wrapper with malformed-data tolerance and degraded mode.
pub struct SessionStore<S> {
    backend: S,
    mirror: Mutex<HashMap<String, String>>,
    degraded: AtomicBool,
}

impl<S: PersistenceEffects> SessionStore<S> {
    /// Wrap a persistence handler.
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            mirror: Mutex::new(HashMap::new()),
            degraded: AtomicBool::new(false),
        }
    }

    /// Borrow the wrapped handler.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Whether the store has fallen back to in-memory operation.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    fn degrade(&self, err: &PersistenceError) {
        if !self.degraded.swap(true, Ordering::AcqRel) {
            warn!(error = %err, "persistence failed, continuing in memory for this session");
        }
    }

    /// Read a raw string value.
    pub fn load_raw(&self, key: &str) -> Option<String> {
        if self.is_degraded() {
            return self.mirror.lock().get(key).cloned();
        }
        match self.backend.get(key) {
            Ok(Some(value)) => {
                self.mirror.lock().insert(key.to_string(), value.clone());
                Some(value)
            }
            Ok(None) => {
                self.mirror.lock().remove(key);
                None
            }
            Err(err) => {
                self.degrade(&err);
                self.mirror.lock().get(key).cloned()
            }
        }
    }

    /// Write a raw string value.
    pub fn save_raw(&self, key: &str, value: String) {
        self.mirror.lock().insert(key.to_string(), value.clone());
        if self.is_degraded() {
            return;
        }
        if let Err(err) = self.backend.set(key, value) {
            self.degrade(&err);
        }
    }

    /// Remove a value.
    pub fn remove(&self, key: &str) {
        self.mirror.lock().remove(key);
        if self.is_degraded() {
            return;
        }
        if let Err(err) = self.backend.remove(key) {
            self.degrade(&err);
        }
    }

    /// Decode a JSON record, falling back to `T::default()` when the key is
    /// absent or the stored value does not parse.
    pub fn load_record<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let Some(raw) = self.load_raw(key) else {
            return T::default();
        };
        match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(err) => {
                warn!(key, error = %err, "discarding malformed record");
                T::default()
            }
        }
    }

    /// Encode and write a JSON record.
    pub fn save_record<T: Serialize>(&self, key: &str, record: &T) {
        match serde_json::to_string(record) {
            Ok(raw) => {
                debug!(key, bytes = raw.len(), "persisting record");
                self.save_raw(key, raw);
            }
            // Plain data records; encoding only fails on non-string map keys.
            Err(err) => warn!(
                key,
                error = %err,
                "record could not be encoded, keeping it in memory only"
            ),
        }
    }
}
