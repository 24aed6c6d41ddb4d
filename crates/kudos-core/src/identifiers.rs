//! Actor identifiers
//!
//! An `ActorId` is the pseudonymous session token issued by the identity
//! provider. It has no relationship to a real account and is never parsed;
//! equality is the only operation that matters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pseudonymous per-session actor key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Wrap an existing token.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing nine characters, the random part of a generated token. Used
    /// as a log field.
    pub fn short(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(8)
            .map_or(0, |(idx, _)| idx);
        &self.0[start..]
    }
}

impl From<String> for ActorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keeps_the_random_suffix() {
        let a = ActorId::new("session_1700000000000_k3j9x2a1q");
        let b = ActorId::new("session_1700000000000_00000zzzz");
        assert_eq!(a.short(), "k3j9x2a1q");
        assert_ne!(a.short(), b.short());
        assert_eq!(ActorId::new("abc").short(), "abc");
    }

    #[test]
    fn serializes_transparently() {
        let actor = ActorId::from("session_1_x");
        let json = serde_json::to_string(&actor).unwrap();
        assert_eq!(json, "\"session_1_x\"");
    }
}
