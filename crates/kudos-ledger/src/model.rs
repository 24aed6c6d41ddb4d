//! Engagement data model
//!
//! Plain serializable records. All mutation goes through
//! `EngagementLedger`; the helpers here enforce the per-target invariants
//! (at-most-once `like`/`love`, one reply per author) so the ledger cannot
//! get them wrong in one place and right in another.

use kudos_core::ActorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Display name rendered for records stored without one.
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";

/// Stable identifier of a reactable item (post, article, video card).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an item identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a top-level comment, monotonic by creation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a reply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReplyId(pub u64);

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reaction kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    /// At most once per actor and target
    Like,
    /// At most once per actor and target
    Love,
    /// Repeatable
    Share,
}

impl ReactionKind {
    /// All kinds, in display order.
    pub const ALL: [ReactionKind; 3] = [Self::Like, Self::Love, Self::Share];

    /// Whether the kind is limited to one application per actor and target.
    pub fn is_exclusive(self) -> bool {
        !matches!(self, Self::Share)
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Love => "love",
            Self::Share => "share",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = String;

    // Widgets send both singular and counter-style names ("likes", "postLikes").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_prefix("post").unwrap_or(&lower);
        match name.strip_suffix('s').unwrap_or(name) {
            "like" => Ok(Self::Like),
            "love" => Ok(Self::Love),
            "share" => Ok(Self::Share),
            _ => Err(format!("unknown reaction kind: {s}")),
        }
    }
}

/// Reaction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionCounts {
    /// Number of likes
    pub likes: u64,
    /// Number of loves
    pub loves: u64,
    /// Number of shares
    pub shares: u64,
}

impl ReactionCounts {
    /// Counters with explicit starting values.
    pub fn new(likes: u64, loves: u64, shares: u64) -> Self {
        Self {
            likes,
            loves,
            shares,
        }
    }

    /// Counter for `kind`.
    pub fn get(&self, kind: ReactionKind) -> u64 {
        match kind {
            ReactionKind::Like => self.likes,
            ReactionKind::Love => self.loves,
            ReactionKind::Share => self.shares,
        }
    }

    fn increment(&mut self, kind: ReactionKind) -> u64 {
        let slot = match kind {
            ReactionKind::Like => &mut self.likes,
            ReactionKind::Love => &mut self.loves,
            ReactionKind::Share => &mut self.shares,
        };
        *slot = slot.saturating_add(1);
        *slot
    }
}

/// One applied exclusive reaction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReactionEntry {
    /// Actor that reacted
    pub actor: ActorId,
    /// Kind applied
    pub kind: ReactionKind,
}

/// Outcome of a reaction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactionResult {
    /// Counter incremented; carries the new value.
    Applied {
        /// Counter value after the increment
        count: u64,
    },
    /// The actor already applied this exclusive kind; nothing changed.
    AlreadyReacted {
        /// Current counter value
        count: u64,
    },
}

impl ReactionResult {
    /// Whether the reaction changed state.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Counter value after the request.
    pub fn count(&self) -> u64 {
        match self {
            Self::Applied { count } | Self::AlreadyReacted { count } => *count,
        }
    }
}

/// Counters plus the de-duplication set for one reactable target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reactions {
    /// Current counters
    pub counts: ReactionCounts,
    /// Exclusive reactions already applied
    pub reacted_by: BTreeSet<ReactionEntry>,
}

impl Reactions {
    /// Reactions starting from seeded counters.
    pub fn with_counts(counts: ReactionCounts) -> Self {
        Self {
            counts,
            reacted_by: BTreeSet::new(),
        }
    }

    /// Whether `actor` already applied `kind`. Always false for `share`.
    pub fn has_reacted(&self, actor: &ActorId, kind: ReactionKind) -> bool {
        kind.is_exclusive()
            && self.reacted_by.contains(&ReactionEntry {
                actor: actor.clone(),
                kind,
            })
    }

    /// Apply a reaction, enforcing at-most-once for exclusive kinds.
    pub(crate) fn apply(&mut self, actor: &ActorId, kind: ReactionKind) -> ReactionResult {
        if kind.is_exclusive() {
            let entry = ReactionEntry {
                actor: actor.clone(),
                kind,
            };
            if self.reacted_by.contains(&entry) {
                return ReactionResult::AlreadyReacted {
                    count: self.counts.get(kind),
                };
            }
            self.reacted_by.insert(entry);
        }
        ReactionResult::Applied {
            count: self.counts.increment(kind),
        }
    }
}

/// Reply to a comment. Replies do not nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Reply identifier
    pub id: ReplyId,
    /// Owning comment
    pub parent: CommentId,
    /// Author's chosen name, possibly empty in legacy records
    #[serde(default)]
    pub author_display_name: String,
    /// Reply text
    pub body: String,
    /// Session that wrote the reply
    pub author: ActorId,
}

impl Reply {
    /// Name to render, falling back to "Anonymous".
    pub fn display_name(&self) -> &str {
        display_or_anonymous(&self.author_display_name)
    }
}

/// Top-level comment on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier
    pub id: CommentId,
    /// Author's chosen name, possibly empty in legacy records
    #[serde(default)]
    pub author_display_name: String,
    /// Comment text
    pub body: String,
    /// Session that wrote the comment
    pub author: ActorId,
    /// Reactions on the comment
    #[serde(default)]
    pub reactions: Reactions,
    /// Replies, oldest first
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    /// Name to render, falling back to "Anonymous".
    pub fn display_name(&self) -> &str {
        display_or_anonymous(&self.author_display_name)
    }

    /// Whether `actor` already replied to this comment.
    pub fn has_reply_from(&self, actor: &ActorId) -> bool {
        self.replies.iter().any(|reply| &reply.author == actor)
    }
}

/// Anything that accumulates reactions and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactableItem {
    /// Item identifier
    pub id: ItemId,
    /// Reactions on the item
    #[serde(default)]
    pub reactions: Reactions,
    /// Top-level comments, newest first
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl ReactableItem {
    /// Item with zero counters and no comments.
    pub fn new(id: ItemId) -> Self {
        Self::with_counts(id, ReactionCounts::default())
    }

    /// Item with seeded counters.
    pub fn with_counts(id: ItemId, counts: ReactionCounts) -> Self {
        Self {
            id,
            reactions: Reactions::with_counts(counts),
            comments: Vec::new(),
        }
    }

    /// Current counters.
    pub fn counts(&self) -> ReactionCounts {
        self.reactions.counts
    }

    /// Look up a comment.
    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == id)
    }

    pub(crate) fn comment_mut(&mut self, id: CommentId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|comment| comment.id == id)
    }

    /// Whether `actor` already has a top-level comment here.
    pub fn has_comment_from(&self, actor: &ActorId) -> bool {
        self.comments.iter().any(|comment| &comment.author == actor)
    }

    /// Highest comment or reply id stored under this item.
    pub(crate) fn max_id(&self) -> u64 {
        self.comments
            .iter()
            .flat_map(|comment| {
                std::iter::once(comment.id.0).chain(comment.replies.iter().map(|r| r.id.0))
            })
            .max()
            .unwrap_or(0)
    }
}

fn display_or_anonymous(name: &str) -> &str {
    if name.trim().is_empty() {
        ANONYMOUS_DISPLAY_NAME
    } else {
        name
    }
}
