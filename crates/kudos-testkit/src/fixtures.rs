//! Reusable test fixtures
//!
//! Deterministic actors and stores. Actor ids follow the real token shape so
//! anything that logs or truncates them behaves as in production.

use kudos_core::{ActorId, SessionStore};
use kudos_effects::MemoryPersistenceHandler;
use std::sync::Arc;

/// Clock value used by fixtures that need one (2024-05-28T12:40:00Z).
pub const FIXTURE_EPOCH_MS: u64 = 1_716_900_000_000;

/// Deterministic actor for `seed`.
pub fn actor(seed: u64) -> ActorId {
    ActorId::new(format!("session_{FIXTURE_EPOCH_MS}_{seed:0>9}"))
}

/// Several distinct deterministic actors.
pub fn actors(count: usize) -> Vec<ActorId> {
    (0..count as u64).map(actor).collect()
}

/// Store over a fresh memory handler. The returned handler shares state with
/// the store, so tests can inspect or corrupt raw values.
pub fn memory_store() -> (
    MemoryPersistenceHandler,
    Arc<SessionStore<MemoryPersistenceHandler>>,
) {
    let backend = MemoryPersistenceHandler::new();
    let store = Arc::new(SessionStore::new(backend.clone()));
    (backend, store)
}

/// Store over an existing handler, as a second "page load" would open it.
pub fn reopen(backend: &MemoryPersistenceHandler) -> Arc<SessionStore<MemoryPersistenceHandler>> {
    Arc::new(SessionStore::new(backend.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actors_are_distinct_and_stable() {
        let all = actors(3);
        assert_eq!(all.len(), 3);
        assert_ne!(all[0], all[1]);
        assert_eq!(actor(7), actor(7));
        assert_eq!(actor(7).as_str(), "session_1716900000000_000000007");
    }

    #[test]
    fn reopen_shares_backend() {
        let (backend, store) = memory_store();
        store.save_raw("kudos:test:key", "v".to_string());
        assert_eq!(reopen(&backend).load_raw("kudos:test:key").as_deref(), Some("v"));
    }
}
