//! Effect interfaces
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `kudos-effects`
//! - **Usage**: identity issuance, ledger and governor persistence, challenge generation
//!
//! All traits are synchronous: every Kudos operation is a short, non-blocking
//! mutation followed by a persistence write, so there is nothing to await.

pub mod persistence;
pub mod random;
pub mod time;

pub use persistence::{PersistenceEffects, PersistenceError};
pub use random::RandomEffects;
pub use time::PhysicalTimeEffects;
