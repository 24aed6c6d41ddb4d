//! Integration tests for the engagement ledger
//!
//! Covers:
//! - Reaction idempotence and share accumulation
//! - Comment and reply validation order
//! - Persistence across reopen, malformed records, degraded storage
//! - Namespace isolation

#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]

use assert_matches::assert_matches;
use kudos_core::effects::PersistenceEffects;
use kudos_core::SessionStore;
use kudos_ledger::{
    AuthorScope, CatalogEntry, CommentId, EngagementError, EngagementLedger, ItemId,
    ReactionKind, ReactionResult,
};
use kudos_testkit::{actor, memory_store, reopen, FailingPersistence, FlakyPersistence};
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn post(id: &str) -> ItemId {
    ItemId::from(id)
}

fn blog_ledger() -> (
    kudos_testkit::MemoryPersistenceHandler,
    EngagementLedger<kudos_testkit::MemoryPersistenceHandler>,
) {
    let (backend, store) = memory_store();
    (backend, EngagementLedger::open("blog", store))
}

// ============================================================================
// Reactions
// ============================================================================

#[test]
fn like_is_idempotent_share_accumulates() {
    let (_, mut ledger) = blog_ledger();
    let a = actor(1);
    let item = post("post-1");

    assert_eq!(
        ledger.react(&item, ReactionKind::Like, &a),
        ReactionResult::Applied { count: 1 }
    );
    assert_eq!(
        ledger.react(&item, ReactionKind::Like, &a),
        ReactionResult::AlreadyReacted { count: 1 }
    );
    assert_eq!(
        ledger.react(&item, ReactionKind::Share, &a),
        ReactionResult::Applied { count: 1 }
    );
    assert_eq!(
        ledger.react(&item, ReactionKind::Share, &a),
        ReactionResult::Applied { count: 2 }
    );

    let counts = ledger.item(&item).unwrap().counts();
    assert_eq!((counts.likes, counts.loves, counts.shares), (1, 0, 2));
    assert!(ledger.has_reacted(&item, &a, ReactionKind::Like));
    assert!(!ledger.has_reacted(&item, &a, ReactionKind::Love));
}

#[test]
fn different_actors_each_count_once() {
    let (_, mut ledger) = blog_ledger();
    let item = post("post-1");
    ledger.seed([CatalogEntry::new("post-1").with_counts(15, 8, 5)]);

    for seed in 0..3 {
        assert!(ledger.react(&item, ReactionKind::Love, &actor(seed)).is_applied());
    }
    assert_eq!(ledger.item(&item).unwrap().counts().loves, 11);
}

#[test]
fn comment_reactions_are_scoped_to_the_comment() {
    let (_, mut ledger) = blog_ledger();
    let item = post("post-1");
    let a = actor(1);
    let b = actor(2);

    let comment = ledger.add_comment(&item, &a, "Ada", "first!").unwrap();
    assert_eq!(
        ledger.react_to_comment(&item, comment, ReactionKind::Like, &b),
        Ok(ReactionResult::Applied { count: 1 })
    );
    assert_eq!(
        ledger.react_to_comment(&item, comment, ReactionKind::Like, &b),
        Ok(ReactionResult::AlreadyReacted { count: 1 })
    );
    assert!(ledger.has_reacted_to_comment(&item, comment, &b, ReactionKind::Like));

    // Liking the comment is not liking the item.
    assert!(!ledger.has_reacted(&item, &b, ReactionKind::Like));
    assert_eq!(ledger.item(&item).unwrap().counts().likes, 0);
}

// ============================================================================
// Comments and replies
// ============================================================================

#[test]
fn comment_validation_sequence() {
    let (_, mut ledger) = blog_ledger();
    let a = actor(1);
    let item = post("post-1");

    assert_eq!(
        ledger.add_comment(&item, &a, "", "hello"),
        Err(EngagementError::MissingName)
    );
    assert_eq!(
        ledger.add_comment(&item, &a, "Alice", ""),
        Err(EngagementError::EmptyBody)
    );
    let id = ledger.add_comment(&item, &a, "Alice", "hello").unwrap();
    assert_eq!(
        ledger.add_comment(&item, &a, "Alice", "again"),
        Err(EngagementError::DuplicateAuthor {
            scope: AuthorScope::Comment
        })
    );

    let stored = ledger.item(&item).unwrap();
    assert_eq!(stored.comments.len(), 1);
    assert_eq!(stored.comment(id).unwrap().body, "hello");
    assert!(ledger.has_commented(&item, &a));
}

#[test]
fn same_actor_may_comment_on_different_items() {
    let (_, mut ledger) = blog_ledger();
    let a = actor(1);
    ledger.add_comment(&post("1"), &a, "Ada", "one").unwrap();
    ledger.add_comment(&post("2"), &a, "Ada", "two").unwrap();
    assert!(ledger.has_commented(&post("2"), &a));
}

#[test]
fn reply_validation_sequence() {
    let (_, mut ledger) = blog_ledger();
    let item = post("post-1");
    let a = actor(1);
    let b = actor(2);
    let comment = ledger.add_comment(&item, &a, "Ada", "question?").unwrap();

    assert_eq!(
        ledger.add_reply(&item, comment, &b, "Bo", "   "),
        Err(EngagementError::EmptyBody)
    );
    assert_eq!(
        ledger.add_reply(&item, comment, &b, " ", "answer"),
        Err(EngagementError::MissingName)
    );
    assert_matches!(
        ledger.add_reply(&item, CommentId(404), &b, "Bo", "answer"),
        Err(EngagementError::CommentNotFound { .. })
    );

    ledger.add_reply(&item, comment, &b, "Bo", "answer").unwrap();
    assert_eq!(
        ledger.add_reply(&item, comment, &b, "Bo", "again"),
        Err(EngagementError::DuplicateAuthor {
            scope: AuthorScope::Reply
        })
    );

    // The comment author may reply to their own comment once.
    ledger.add_reply(&item, comment, &a, "Ada", "thanks").unwrap();
    assert!(ledger.has_replied(&item, comment, &a));
    assert_eq!(
        ledger.item(&item).unwrap().comment(comment).unwrap().replies.len(),
        2
    );
}

#[test]
fn reply_on_unknown_item_does_not_create_it() {
    let (backend, mut ledger) = blog_ledger();
    let item = post("ghost");
    assert_matches!(
        ledger.add_reply(&item, CommentId(1), &actor(1), "Ada", "hi"),
        Err(EngagementError::CommentNotFound { .. })
    );
    assert!(ledger.item(&item).is_none());
    assert!(backend.is_empty());
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn state_survives_reopen() {
    let (backend, mut ledger) = blog_ledger();
    let item = post("post-1");
    let a = actor(1);
    ledger.react(&item, ReactionKind::Like, &a);
    let comment = ledger.add_comment(&item, &a, "Ada", "hi").unwrap();

    let mut reopened = EngagementLedger::open("blog", reopen(&backend));
    assert_eq!(reopened.snapshot(), ledger.snapshot());
    assert_eq!(
        reopened.react(&item, ReactionKind::Like, &a),
        ReactionResult::AlreadyReacted { count: 1 }
    );
    assert_eq!(
        reopened.add_comment(&item, &a, "Ada", "hi again"),
        Err(EngagementError::DuplicateAuthor {
            scope: AuthorScope::Comment
        })
    );

    // Ids keep increasing after a reload.
    let next = reopened.add_comment(&item, &actor(2), "Bo", "hey").unwrap();
    assert!(next > comment);
}

#[test]
fn malformed_record_falls_back_to_empty() {
    let (backend, store) = memory_store();
    backend.set("kudos:blog:ledger", "{not json".to_string()).unwrap();

    let mut ledger = EngagementLedger::open("blog", store.clone());
    assert_eq!(ledger.items().count(), 0);
    assert!(!store.is_degraded());

    // The next successful write replaces the malformed record.
    ledger.react(&post("1"), ReactionKind::Share, &actor(1));
    let raw = backend.get("kudos:blog:ledger").unwrap().unwrap();
    assert!(raw.starts_with('{'));
    assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
}

#[test]
fn namespaces_are_isolated() {
    let (_, store) = memory_store();
    let mut blog = EngagementLedger::open("blog", store.clone());
    let mut videos = EngagementLedger::open("videos", store);
    let a = actor(1);

    blog.react(&post("1"), ReactionKind::Like, &a);
    assert!(videos.react(&post("1"), ReactionKind::Like, &a).is_applied());
    assert_eq!(blog.storage_key(), "kudos:blog:ledger");
    assert_eq!(videos.storage_key(), "kudos:videos:ledger");
}

#[test]
fn unavailable_storage_keeps_working_in_memory() {
    let store = Arc::new(SessionStore::new(FailingPersistence::new()));
    let mut ledger = EngagementLedger::open("blog", store);
    let a = actor(1);
    let item = post("post-1");

    assert!(ledger.react(&item, ReactionKind::Like, &a).is_applied());
    assert!(!ledger.react(&item, ReactionKind::Like, &a).is_applied());
    ledger.add_comment(&item, &a, "Ada", "still works").unwrap();
    assert!(ledger.is_degraded());

    // Reload reads back from the in-memory mirror.
    let before = ledger.snapshot();
    ledger.reload();
    assert_eq!(ledger.snapshot(), before);
}

#[test]
fn storage_failing_mid_session_loses_nothing() {
    // One successful read at open, one successful write, then failures.
    let flaky = FlakyPersistence::fail_after(2);
    let store = Arc::new(SessionStore::new(flaky.clone()));
    let mut ledger = EngagementLedger::open("blog", store);
    let a = actor(1);
    let item = post("post-1");

    ledger.react(&item, ReactionKind::Like, &a);
    ledger.react(&item, ReactionKind::Love, &a);
    ledger.react(&item, ReactionKind::Share, &a);
    assert!(ledger.is_degraded());

    ledger.reload();
    let counts = ledger.item(&item).unwrap().counts();
    assert_eq!((counts.likes, counts.loves, counts.shares), (1, 1, 1));

    // The backend kept the last value written before it failed.
    assert!(flaky.inner().keys().contains(&"kudos:blog:ledger".to_string()));
}
