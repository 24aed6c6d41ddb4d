//! Engagement ledger
//!
//! One ledger per reactable-item collection, identified by a namespace
//! (`blog`, `videos`, `auth-widget`). The whole collection is persisted as a
//! single JSON record under `kudos:<namespace>:ledger` after every mutation
//! that changed state. Rejected requests never write.
//!
//! # Ordering
//!
//! - Top-level comments are kept newest first.
//! - Replies are kept oldest first (conversation order).
//! - Counters only grow; there is no "unlike".

use crate::catalog::CatalogEntry;
use crate::error::{AuthorScope, EngagementError};
use crate::model::{
    Comment, CommentId, ItemId, ReactableItem, ReactionKind, ReactionResult, Reactions, Reply,
    ReplyId,
};
use indexmap::IndexMap;
use kudos_core::effects::PersistenceEffects;
use kudos_core::{namespaced_key, ActorId, SessionStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

const LEDGER_SUFFIX: &str = "ledger";

/// Serializable ledger state, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSnapshot {
    /// Items by id
    pub items: IndexMap<ItemId, ReactableItem>,
    /// Last comment/reply id handed out
    pub last_id: u64,
}

impl LedgerSnapshot {
    /// Make sure the id sequence is ahead of every stored id (records
    /// written by older widgets carry no sequence).
    fn normalize(&mut self) {
        let highest = self
            .items
            .values()
            .map(ReactableItem::max_id)
            .max()
            .unwrap_or(0);
        if highest > self.last_id {
            warn!(
                last_id = self.last_id,
                highest, "ledger id sequence behind stored ids, advancing"
            );
            self.last_id = highest;
        }
    }

    fn next_id(&mut self) -> u64 {
        self.last_id = self.last_id.saturating_add(1);
        self.last_id
    }
}

/// Session-scoped engagement ledger.
pub struct EngagementLedger<S> {
    namespace: String,
    key: String,
    store: Arc<SessionStore<S>>,
    state: LedgerSnapshot,
}

impl<S: PersistenceEffects> EngagementLedger<S> {
    /// Open the ledger for `namespace`, loading any persisted state.
    pub fn open(namespace: impl Into<String>, store: Arc<SessionStore<S>>) -> Self {
        let namespace = namespace.into();
        let key = namespaced_key(&namespace, LEDGER_SUFFIX);
        let mut state: LedgerSnapshot = store.load_record(&key);
        state.normalize();
        debug!(
            namespace = %namespace,
            items = state.items.len(),
            "opened engagement ledger"
        );
        Self {
            namespace,
            key,
            store,
            state,
        }
    }

    /// Namespace of this ledger.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Persistence key of this ledger.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Whether persistence has degraded to memory-only.
    pub fn is_degraded(&self) -> bool {
        self.store.is_degraded()
    }

    fn persist(&self) {
        self.store.save_record(&self.key, &self.state);
    }

    /// Register catalog items. Items already present keep their state.
    ///
    /// Returns the number of newly registered items.
    pub fn seed<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut added = 0;
        for entry in entries {
            if self.state.items.contains_key(&entry.id) {
                continue;
            }
            let item = ReactableItem::with_counts(entry.id.clone(), entry.counts);
            self.state.items.insert(entry.id, item);
            added += 1;
        }
        if added > 0 {
            debug!(namespace = %self.namespace, added, "seeded catalog items");
            self.persist();
        }
        added
    }

    fn item_entry(&mut self, item_id: &ItemId) -> &mut ReactableItem {
        self.state
            .items
            .entry(item_id.clone())
            .or_insert_with(|| ReactableItem::new(item_id.clone()))
    }

    /// React to an item. `like`/`love` apply at most once per actor; `share`
    /// always applies. Unknown items are created with zero counters.
    pub fn react(
        &mut self,
        item_id: &ItemId,
        kind: ReactionKind,
        actor: &ActorId,
    ) -> ReactionResult {
        let result = self.item_entry(item_id).reactions.apply(actor, kind);
        self.after_reaction(item_id, None, kind, actor, result);
        result
    }

    /// React to a comment, with the same semantics as [`react`](Self::react).
    pub fn react_to_comment(
        &mut self,
        item_id: &ItemId,
        comment_id: CommentId,
        kind: ReactionKind,
        actor: &ActorId,
    ) -> Result<ReactionResult, EngagementError> {
        let comment = self
            .state
            .items
            .get_mut(item_id)
            .and_then(|item| item.comment_mut(comment_id))
            .ok_or_else(|| EngagementError::comment_not_found(item_id, comment_id))?;
        let result = comment.reactions.apply(actor, kind);
        self.after_reaction(item_id, Some(comment_id), kind, actor, result);
        Ok(result)
    }

    fn after_reaction(
        &self,
        item_id: &ItemId,
        comment_id: Option<CommentId>,
        kind: ReactionKind,
        actor: &ActorId,
        result: ReactionResult,
    ) {
        match result {
            ReactionResult::Applied { count } => {
                debug!(
                    namespace = %self.namespace,
                    item = %item_id,
                    comment = ?comment_id,
                    kind = %kind,
                    count,
                    "reaction applied"
                );
                self.persist();
            }
            ReactionResult::AlreadyReacted { .. } => {
                debug!(
                    namespace = %self.namespace,
                    item = %item_id,
                    comment = ?comment_id,
                    kind = %kind,
                    actor = actor.short(),
                    "duplicate reaction ignored"
                );
            }
        }
    }

    /// Post the session's top-level comment on an item.
    pub fn add_comment(
        &mut self,
        item_id: &ItemId,
        actor: &ActorId,
        display_name: &str,
        body: &str,
    ) -> Result<CommentId, EngagementError> {
        let (name, body) = validate_submission(display_name, body)?;

        if self
            .state
            .items
            .get(item_id)
            .is_some_and(|item| item.has_comment_from(actor))
        {
            return Err(EngagementError::DuplicateAuthor {
                scope: AuthorScope::Comment,
            });
        }

        let id = CommentId(self.state.next_id());
        let comment = Comment {
            id,
            author_display_name: name,
            body,
            author: actor.clone(),
            reactions: Reactions::default(),
            replies: Vec::new(),
        };
        self.item_entry(item_id).comments.insert(0, comment);
        debug!(namespace = %self.namespace, item = %item_id, comment = %id, "comment added");
        self.persist();
        Ok(id)
    }

    /// Post the session's reply to a comment.
    pub fn add_reply(
        &mut self,
        item_id: &ItemId,
        comment_id: CommentId,
        actor: &ActorId,
        display_name: &str,
        body: &str,
    ) -> Result<ReplyId, EngagementError> {
        let (name, body) = validate_submission(display_name, body)?;

        let exists = self
            .state
            .items
            .get(item_id)
            .and_then(|item| item.comment(comment_id))
            .map(|comment| comment.has_reply_from(actor));
        match exists {
            None => return Err(EngagementError::comment_not_found(item_id, comment_id)),
            Some(true) => {
                return Err(EngagementError::DuplicateAuthor {
                    scope: AuthorScope::Reply,
                })
            }
            Some(false) => {}
        }

        let id = ReplyId(self.state.next_id());
        let reply = Reply {
            id,
            parent: comment_id,
            author_display_name: name,
            body,
            author: actor.clone(),
        };
        if let Some(comment) = self
            .state
            .items
            .get_mut(item_id)
            .and_then(|item| item.comment_mut(comment_id))
        {
            comment.replies.push(reply);
        }
        debug!(
            namespace = %self.namespace,
            item = %item_id,
            comment = %comment_id,
            reply = %id,
            "reply added"
        );
        self.persist();
        Ok(id)
    }

    /// Look up an item.
    pub fn item(&self, item_id: &ItemId) -> Option<&ReactableItem> {
        self.state.items.get(item_id)
    }

    /// All items, in registration order.
    pub fn items(&self) -> impl Iterator<Item = &ReactableItem> {
        self.state.items.values()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.clone()
    }

    /// Whether `actor` already applied `kind` to the item.
    pub fn has_reacted(&self, item_id: &ItemId, actor: &ActorId, kind: ReactionKind) -> bool {
        self.item(item_id)
            .is_some_and(|item| item.reactions.has_reacted(actor, kind))
    }

    /// Whether `actor` already applied `kind` to the comment.
    pub fn has_reacted_to_comment(
        &self,
        item_id: &ItemId,
        comment_id: CommentId,
        actor: &ActorId,
        kind: ReactionKind,
    ) -> bool {
        self.item(item_id)
            .and_then(|item| item.comment(comment_id))
            .is_some_and(|comment| comment.reactions.has_reacted(actor, kind))
    }

    /// Whether `actor` already commented on the item.
    pub fn has_commented(&self, item_id: &ItemId, actor: &ActorId) -> bool {
        self.item(item_id)
            .is_some_and(|item| item.has_comment_from(actor))
    }

    /// Whether `actor` already replied to the comment.
    pub fn has_replied(&self, item_id: &ItemId, comment_id: CommentId, actor: &ActorId) -> bool {
        self.item(item_id)
            .and_then(|item| item.comment(comment_id))
            .is_some_and(|comment| comment.has_reply_from(actor))
    }

    /// Discard in-memory state and re-read the persisted record.
    pub fn reload(&mut self) {
        let mut state: LedgerSnapshot = self.store.load_record(&self.key);
        state.normalize();
        self.state = state;
    }
}

fn validate_submission(
    display_name: &str,
    body: &str,
) -> Result<(String, String), EngagementError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(EngagementError::EmptyBody);
    }
    let name = display_name.trim();
    if name.is_empty() {
        return Err(EngagementError::MissingName);
    }
    Ok((name.to_string(), body.to_string()))
}
