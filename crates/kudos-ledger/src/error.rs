//! Engagement rejection types
//!
//! Every variant is an expected, recoverable outcome. The ledger leaves its
//! state untouched when it returns one, and `user_message` gives the inline
//! feedback text a widget shows for it.

use crate::model::{CommentId, ItemId};
use thiserror::Error;

/// What a duplicate-author rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorScope {
    /// Top-level comment on an item
    Comment,
    /// Reply to a comment
    Reply,
}

/// Rejections from engagement ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngagementError {
    /// Body is empty after trimming.
    #[error("body is blank")]
    EmptyBody,

    /// Display name is empty after trimming.
    #[error("display name is blank")]
    MissingName,

    /// The session already posted in this scope.
    #[error("session already posted a {scope:?} here")]
    DuplicateAuthor {
        /// Comment or reply
        scope: AuthorScope,
    },

    /// The comment does not exist under the item.
    #[error("comment {comment_id} not found on item {item_id}")]
    CommentNotFound {
        /// Item searched
        item_id: ItemId,
        /// Comment requested
        comment_id: CommentId,
    },
}

impl EngagementError {
    /// Create a comment-not-found rejection.
    pub fn comment_not_found(item_id: &ItemId, comment_id: CommentId) -> Self {
        Self::CommentNotFound {
            item_id: item_id.clone(),
            comment_id,
        }
    }

    /// Feedback text for the widget.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyBody => "Please write your comment.",
            Self::MissingName => "Please enter your name for the comment.",
            Self::DuplicateAuthor {
                scope: AuthorScope::Comment,
            } => "You have already posted a comment on this item in this session.",
            Self::DuplicateAuthor {
                scope: AuthorScope::Reply,
            } => "You have already replied to this comment in this session.",
            Self::CommentNotFound { .. } => "That comment is no longer available.",
        }
    }
}
