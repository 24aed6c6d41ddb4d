//! Remembered display names
//!
//! Comment forms pre-fill the name the session used last time. Each widget
//! scope (`blog`, `videos`) remembers its own.

use kudos_core::effects::PersistenceEffects;
use kudos_core::{namespaced_key, SessionStore};
use std::sync::Arc;

const DISPLAY_NAME_SUFFIX: &str = "display-name";

/// Per-scope display name memory.
pub struct DisplayNameMemory<S> {
    store: Arc<SessionStore<S>>,
}

impl<S: PersistenceEffects> DisplayNameMemory<S> {
    /// Create a memory over `store`.
    pub fn new(store: Arc<SessionStore<S>>) -> Self {
        Self { store }
    }

    /// Last remembered name for `scope`.
    pub fn remembered(&self, scope: &str) -> Option<String> {
        self.store
            .load_raw(&namespaced_key(scope, DISPLAY_NAME_SUFFIX))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Remember `name` for `scope`. A blank name forgets it.
    pub fn remember(&self, scope: &str, name: &str) {
        let key = namespaced_key(scope, DISPLAY_NAME_SUFFIX);
        let trimmed = name.trim();
        if trimmed.is_empty() {
            self.store.remove(&key);
        } else {
            self.store.save_raw(&key, trimmed.to_string());
        }
    }
}
