//! Session identity provider
//!
//! Issues the pseudonymous `ActorId` every ledger and governor operation is
//! keyed on. The token is created lazily on first request, persisted under a
//! fixed key, and reused on every later request in the same storage scope.
//! It is a pseudonymity token, not a credential.
//!
//! When storage is unavailable the provider still answers: the token lives
//! in the provider (and the store's in-memory mirror) for the rest of the
//! process.

use kudos_core::effects::{PersistenceEffects, PhysicalTimeEffects, RandomEffects};
use kudos_core::{ActorId, SessionStore};
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Default persistence key for the session identity.
pub const SESSION_IDENTITY_KEY: &str = "kudos:session-identity";

const TOKEN_PREFIX: &str = "session";
const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lazily created, persisted session identity.
pub struct IdentityProvider<S, R, T> {
    store: Arc<SessionStore<S>>,
    random: R,
    clock: T,
    key: String,
    resolved: OnceLock<ActorId>,
}

impl<S, R, T> IdentityProvider<S, R, T>
where
    S: PersistenceEffects,
    R: RandomEffects,
    T: PhysicalTimeEffects,
{
    /// Provider using the default key.
    pub fn new(store: Arc<SessionStore<S>>, random: R, clock: T) -> Self {
        Self::with_key(store, random, clock, SESSION_IDENTITY_KEY)
    }

    /// Provider storing its token under `key`.
    pub fn with_key(
        store: Arc<SessionStore<S>>,
        random: R,
        clock: T,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            random,
            clock,
            key: key.into(),
            resolved: OnceLock::new(),
        }
    }

    /// Persistence key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The session identity, created on first call.
    pub fn identity(&self) -> ActorId {
        self.resolved.get_or_init(|| self.resolve()).clone()
    }

    fn resolve(&self) -> ActorId {
        if let Some(existing) = self.store.load_raw(&self.key) {
            let trimmed = existing.trim();
            if !trimmed.is_empty() {
                return ActorId::new(trimmed);
            }
        }
        let actor = self.generate();
        self.store.save_raw(&self.key, actor.as_str().to_string());
        info!(
            actor = actor.short(),
            degraded = self.store.is_degraded(),
            "issued session identity"
        );
        actor
    }

    fn generate(&self) -> ActorId {
        let millis = self.clock.physical_time_ms();
        let mut entropy = self.random.random_u64();
        let mut suffix = String::with_capacity(SUFFIX_LEN);
        for _ in 0..SUFFIX_LEN {
            suffix.push(char::from(BASE36[(entropy % 36) as usize]));
            entropy /= 36;
        }
        ActorId::new(format!("{TOKEN_PREFIX}_{millis}_{suffix}"))
    }
}
