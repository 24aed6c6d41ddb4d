//! Kudos Core - Interface Layer
//!
//! Shared vocabulary for the Kudos engagement workspace:
//!
//! - Effect interfaces: `PersistenceEffects`, `RandomEffects`, `PhysicalTimeEffects`
//! - Identifiers: `ActorId`, the pseudonymous session key every operation is gated on
//! - Persistence policy: `SessionStore`, which degrades to in-memory operation
//!   when the backing adapter fails
//! - Configuration: `KudosConfig` and its sections
//! - Errors: `KudosError` for infrastructure failures
//!
//! Handlers for the effect traits live in `kudos-effects`; feature crates
//! (`kudos-ledger`, `kudos-guards`) depend only on this crate.

pub mod config;
pub mod effects;
pub mod errors;
pub mod identifiers;
pub mod store;

pub use config::{ChallengeConfig, GovernorConfig, KudosConfig, LoggingConfig};
pub use effects::{PersistenceEffects, PersistenceError, PhysicalTimeEffects, RandomEffects};
pub use errors::{KudosError, Result};
pub use identifiers::ActorId;
pub use store::SessionStore;

/// Prefix shared by every persisted key written by Kudos components.
pub const KEY_PREFIX: &str = "kudos";

/// Build a namespaced persistence key, e.g. `kudos:blog:ledger`.
pub fn namespaced_key(namespace: &str, suffix: &str) -> String {
    format!("{KEY_PREFIX}:{namespace}:{suffix}")
}
