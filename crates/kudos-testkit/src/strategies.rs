//! Property test strategies for engagement inputs
//!
//! Strategies return plain values (`ActorId`, strings) rather than ledger
//! types so this crate stays below the feature crates in the dependency
//! graph.

use kudos_core::ActorId;
use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use crate::fixtures::actor;

/// Deterministic actor drawn from a small pool, so collisions happen often.
pub fn arb_actor() -> impl Strategy<Value = ActorId> {
    (0u64..8).prop_map(actor)
}

/// Item identifier from a small pool.
pub fn arb_item_key() -> impl Strategy<Value = String> {
    (0u32..4).prop_map(|n| format!("post-{n}"))
}

/// Non-blank text with surrounding whitespace to exercise trimming.
pub fn arb_text() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", " ", "  ", "\n"]),
        prop::sample::select(vec!["hello", "nice post", "Ada", "thanks!", "+1"]),
        prop::sample::select(vec!["", " ", "\t"]),
    )
        .prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
}

/// Text that is blank after trimming.
pub fn arb_blank() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["", " ", "   ", "\n\t", " \n "]).prop_map(str::to_string)
}

/// Challenge answer near the valid range for default operands (2..=20).
pub fn arb_answer() -> impl Strategy<Value = u32> {
    0u32..25
}
