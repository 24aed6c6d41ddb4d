//! In-memory persistence handler for testing and ephemeral sessions

use kudos_core::effects::{PersistenceEffects, PersistenceError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory persistence handler.
///
/// Clones share the same underlying map, which lets a test hand one clone to
/// a component and inspect or tamper with the raw values through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistenceHandler {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryPersistenceHandler {
    /// Create an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Drop every stored value (models the user clearing site data).
    pub fn clear(&self) {
        self.data.write().clear();
    }
}

impl PersistenceEffects for MemoryPersistenceHandler {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, PersistenceError> {
        Ok(self.data.write().remove(key).is_some())
    }
}
