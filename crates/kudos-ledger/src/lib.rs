//! Kudos Ledger - Engagement Layer
//!
//! Session-scoped engagement state for static content feeds:
//!
//! - `IdentityProvider`: lazily issued, persisted pseudonymous `ActorId`
//! - `EngagementLedger`: reactions (`like`/`love` at most once per session,
//!   `share` unlimited), one top-level comment per session per item, one
//!   reply per session per comment
//! - `DisplayNameMemory`: remembered comment-form names per widget scope
//!
//! All state goes through `kudos_core::SessionStore`, so a broken storage
//! backend degrades to in-memory operation instead of failing requests.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(SessionStore::new(MemoryPersistenceHandler::new()));
//! let actor = IdentityProvider::new(store.clone(), RealRandomHandler, RealTimeHandler).identity();
//! let mut ledger = EngagementLedger::open("blog", store);
//! ledger.seed([CatalogEntry::new("1").with_counts(15, 8, 5)]);
//! ledger.react(&ItemId::from("1"), ReactionKind::Like, &actor);
//! ```

pub mod catalog;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod model;
pub mod preferences;

pub use catalog::CatalogEntry;
pub use error::{AuthorScope, EngagementError};
pub use identity::{IdentityProvider, SESSION_IDENTITY_KEY};
pub use ledger::{EngagementLedger, LedgerSnapshot};
pub use model::{
    Comment, CommentId, ItemId, ReactableItem, ReactionCounts, ReactionEntry, ReactionKind,
    ReactionResult, Reactions, Reply, ReplyId, ANONYMOUS_DISPLAY_NAME,
};
pub use preferences::DisplayNameMemory;
