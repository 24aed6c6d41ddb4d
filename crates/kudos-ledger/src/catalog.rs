//! Catalog feed entries
//!
//! Static content catalogs (blog posts, videos) own their own display data.
//! The ledger only needs each item's id and the counters it starts from.

use crate::model::{ItemId, ReactionCounts};
use serde::{Deserialize, Serialize};

/// One catalog item to register with a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Item identifier
    pub id: ItemId,
    /// Counters the item starts with
    #[serde(default)]
    pub counts: ReactionCounts,
}

impl CatalogEntry {
    /// Entry with zero counters.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            counts: ReactionCounts::default(),
        }
    }

    /// Set starting counters.
    pub fn with_counts(mut self, likes: u64, loves: u64, shares: u64) -> Self {
        self.counts = ReactionCounts::new(likes, loves, shares);
        self
    }
}

impl From<ItemId> for CatalogEntry {
    fn from(id: ItemId) -> Self {
        Self::new(id)
    }
}
