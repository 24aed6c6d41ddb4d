//! Kudos Testing Infrastructure
//!
//! Shared setup for tests across the workspace:
//!
//! - `mocks`: persistence handlers that fail on demand, fixed randomness
//! - `fixtures`: deterministic actors and ready-made stores
//! - `strategies`: proptest strategies for engagement inputs
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! kudos-testkit = { path = "../kudos-testkit" }
//! ```
//!
//! ```rust,no_run
//! use kudos_testkit::*;
//!
//! let (backend, store) = memory_store();
//! let alice = actor(1);
//! assert!(!store.is_degraded());
//! # let _ = (backend, alice);
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod fixtures;
pub mod mocks;
pub mod strategies;

pub use fixtures::*;
pub use mocks::*;

// Re-export commonly used types
pub use kudos_core::{ActorId, SessionStore};
pub use kudos_effects::{MemoryPersistenceHandler, SimulatedTimeHandler};
