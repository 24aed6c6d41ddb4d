//! Timed arithmetic challenge
//!
//! `ChallengeGate` is a low-assurance human check: two small operands, their
//! sum as the answer, and a countdown measured in logical seconds. The gate
//! knows nothing about failure counting; `AttemptGovernor` layers that on
//! top, so any guarded flow can reuse one gate.
//!
//! Time only moves when `tick()` is called. Wall-clock scheduling belongs to
//! `CountdownDriver`.

use kudos_core::effects::RandomEffects;
use kudos_core::ChallengeConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One issued challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeState {
    /// The two addends
    pub operands: (u32, u32),
    /// Their sum
    pub expected_answer: u32,
    /// Logical seconds left before the challenge is replaced
    pub remaining_seconds: u32,
    /// Last value the user entered, if any
    pub user_answer: Option<u32>,
}

impl ChallengeState {
    /// Prompt text, e.g. `3 + 4`.
    pub fn prompt(&self) -> String {
        format!("{} + {}", self.operands.0, self.operands.1)
    }
}

impl fmt::Display for ChallengeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ? ({}s left)", self.prompt(), self.remaining_seconds)
    }
}

/// Result of advancing the countdown by one logical second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeTick {
    /// Countdown still running.
    Running(ChallengeState),
    /// The countdown hit zero; carries the challenge issued in its place.
    Expired(ChallengeState),
    /// No challenge is active.
    Inactive,
}

/// Answer check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Matches the expected answer
    Correct,
    /// Wrong, unreadable, or no challenge active
    Incorrect,
}

/// Values accepted as a challenge answer.
///
/// Form input arrives as text; anything that does not parse as a
/// non-negative integer reads as no answer.
pub trait ChallengeAnswer {
    /// Numeric answer, if readable.
    fn numeric(&self) -> Option<u32>;
}

impl ChallengeAnswer for u32 {
    fn numeric(&self) -> Option<u32> {
        Some(*self)
    }
}

impl ChallengeAnswer for Option<u32> {
    fn numeric(&self) -> Option<u32> {
        *self
    }
}

impl ChallengeAnswer for &str {
    fn numeric(&self) -> Option<u32> {
        self.trim().parse().ok()
    }
}

impl ChallengeAnswer for String {
    fn numeric(&self) -> Option<u32> {
        self.as_str().numeric()
    }
}

/// Single-slot challenge issuer with a logical countdown.
pub struct ChallengeGate<R> {
    random: R,
    config: ChallengeConfig,
    current: Option<ChallengeState>,
    issued: u64,
}

impl<R: RandomEffects> ChallengeGate<R> {
    /// Gate with default settings (operands 1..=10, 10 second budget).
    pub fn new(random: R) -> Self {
        Self::with_config(random, ChallengeConfig::default())
    }

    /// Gate with explicit settings.
    pub fn with_config(random: R, config: ChallengeConfig) -> Self {
        Self {
            random,
            config,
            current: None,
            issued: 0,
        }
    }

    /// Active settings.
    pub fn config(&self) -> &ChallengeConfig {
        &self.config
    }

    /// Issue a fresh challenge, replacing any active one.
    pub fn issue(&mut self) -> ChallengeState {
        let a = self.operand();
        let b = self.operand();
        let state = ChallengeState {
            operands: (a, b),
            expected_answer: a.saturating_add(b),
            remaining_seconds: self.config.budget_seconds,
            user_answer: None,
        };
        self.issued += 1;
        self.current = Some(state.clone());
        state
    }

    fn operand(&self) -> u32 {
        let min = self.config.operand_min;
        let max = self.config.operand_max;
        let value = self.random.random_range(u64::from(min), u64::from(max));
        u32::try_from(value).unwrap_or(min)
    }

    /// Advance the countdown one logical second. At zero the challenge is
    /// replaced and `Expired` is reported for this tick.
    pub fn tick(&mut self) -> ChallengeTick {
        let Some(current) = self.current.as_mut() else {
            return ChallengeTick::Inactive;
        };
        current.remaining_seconds = current.remaining_seconds.saturating_sub(1);
        if current.remaining_seconds > 0 {
            return ChallengeTick::Running(current.clone());
        }
        ChallengeTick::Expired(self.issue())
    }

    /// Compare `answer` with the active challenge. Does not consume it.
    pub fn verify<A: ChallengeAnswer>(&self, answer: A) -> Verdict {
        match (&self.current, answer.numeric()) {
            (Some(state), Some(value)) if value == state.expected_answer => Verdict::Correct,
            _ => Verdict::Incorrect,
        }
    }

    /// Remember what the user typed. Returns false when nothing is active.
    pub fn record_answer(&mut self, answer: u32) -> bool {
        match self.current.as_mut() {
            Some(state) => {
                state.user_answer = Some(answer);
                true
            }
            None => false,
        }
    }

    /// Drop the active challenge.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Active challenge, if any.
    pub fn current(&self) -> Option<&ChallengeState> {
        self.current.as_ref()
    }

    /// Whether a challenge is active.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Number of challenges issued so far.
    pub fn issued_count(&self) -> u64 {
        self.issued
    }
}
