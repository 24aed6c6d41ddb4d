//! Attempt governor
//!
//! Wraps a guarded action (credential check, uniqueness check) behind a
//! `ChallengeGate` and a persisted consecutive-failure counter.
//!
//! ```text
//!            activate / attempt          failure (< threshold)
//!   Idle ───────────────────> ChallengeIssued <──────────┐
//!    ^                          │        │               │
//!    │ success                  │        └───────────────┘
//!    └──────────────────────────┘        │ failure (>= threshold)
//!    ^                                   v
//!    └──────────── reset ────────── Locked
//! ```
//!
//! `reset()` is the only way out of `Locked`; success is the only implicit
//! reset of the counter. The counter is stored per actor, so a reloaded
//! governor for a locked-out actor starts `Locked`.

use crate::challenge::{ChallengeAnswer, ChallengeGate, ChallengeState, ChallengeTick, Verdict};
use kudos_core::effects::{PersistenceEffects, RandomEffects};
use kudos_core::{namespaced_key, ActorId, GovernorConfig, KudosConfig, SessionStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Governor phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernorPhase {
    /// No challenge pending
    Idle,
    /// Waiting for an answer
    ChallengeIssued,
    /// Too many consecutive failures; only `reset()` leaves this phase
    Locked,
}

impl fmt::Display for GovernorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ChallengeIssued => "challenge-issued",
            Self::Locked => "locked",
        };
        f.write_str(name)
    }
}

/// Snapshot of governor state for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorState {
    /// Consecutive failures so far
    pub failure_count: u32,
    /// Failures that trigger lockout
    pub lockout_threshold: u32,
    /// Current phase
    pub phase: GovernorPhase,
}

impl GovernorState {
    /// Whether the counter has reached the threshold.
    pub fn locked(&self) -> bool {
        self.failure_count >= self.lockout_threshold
    }

    /// Failures left before lockout.
    pub fn remaining_attempts(&self) -> u32 {
        self.lockout_threshold.saturating_sub(self.failure_count)
    }
}

/// Why a challenge was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeFailure {
    /// A number was given but it was wrong
    Incorrect,
    /// Blank or non-numeric input
    Unanswered,
}

/// Result of `AttemptGovernor::attempt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    /// Challenge passed and the guarded action accepted; counter cleared.
    Success,
    /// Challenge rejected; the guarded action was not run.
    ChallengeFailed {
        /// Why the challenge failed
        reason: ChallengeFailure,
        /// Consecutive failures after this one
        failures: u32,
    },
    /// Challenge passed but the guarded action refused.
    ActionFailed {
        /// Consecutive failures after this one
        failures: u32,
    },
    /// Locked out; nothing was evaluated.
    Locked,
    /// No challenge was pending. One has now been issued; nothing counted.
    NoChallenge,
}

impl AttemptOutcome {
    /// Whether the attempt succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Whether this outcome counted as a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ChallengeFailed { .. } | Self::ActionFailed { .. })
    }

    /// Feedback text for the widget.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Success => "Verified.",
            Self::ChallengeFailed {
                reason: ChallengeFailure::Incorrect,
                ..
            } => "Incorrect CAPTCHA answer. Please try again.",
            Self::ChallengeFailed {
                reason: ChallengeFailure::Unanswered,
                ..
            } => "Please solve the CAPTCHA.",
            Self::ActionFailed { .. } => "That did not work. Please check your details.",
            Self::Locked => "Too many failed attempts. Go back to try again.",
            Self::NoChallenge => "A new CAPTCHA was generated. Please solve it.",
        }
    }
}

/// Result of `AttemptGovernor::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernorTick {
    /// Countdown running.
    Running {
        /// Seconds left on the current challenge
        remaining_seconds: u32,
    },
    /// The challenge ran out and was replaced.
    Expired {
        /// Whether the expiry was counted as a failure
        counted: bool,
        /// Consecutive failures after the expiry
        failures: u32,
        /// Whether the expiry tripped lockout (no fresh challenge then)
        locked: bool,
    },
    /// Idle or locked; nothing to count down.
    Inactive,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
struct FailureRecord {
    failures: u32,
}

/// Challenge-gated attempt state machine with persisted lockout.
pub struct AttemptGovernor<S, R> {
    actor: ActorId,
    key: String,
    store: Arc<SessionStore<S>>,
    gate: ChallengeGate<R>,
    config: GovernorConfig,
    failures: u32,
    phase: GovernorPhase,
}

impl<S, R> AttemptGovernor<S, R>
where
    S: PersistenceEffects,
    R: RandomEffects,
{
    /// Governor for `actor` in `namespace`, resuming any persisted counter.
    pub fn new(
        namespace: &str,
        actor: ActorId,
        store: Arc<SessionStore<S>>,
        gate: ChallengeGate<R>,
        config: GovernorConfig,
    ) -> Self {
        let key = namespaced_key(namespace, &format!("failures:{actor}"));
        let record: FailureRecord = store.load_record(&key);
        let mut governor = Self {
            actor,
            key,
            store,
            gate,
            config,
            failures: record.failures,
            phase: GovernorPhase::Idle,
        };
        if governor.threshold_reached() {
            governor.phase = GovernorPhase::Locked;
            info!(
                actor = governor.actor.short(),
                failures = governor.failures,
                "governor resumed in lockout"
            );
        }
        governor
    }

    /// Governor wired from a loaded configuration.
    pub fn from_config(
        config: &KudosConfig,
        actor: ActorId,
        store: Arc<SessionStore<S>>,
        random: R,
    ) -> Self {
        let gate = ChallengeGate::with_config(random, config.challenge.clone());
        Self::new(
            &config.namespace,
            actor,
            store,
            gate,
            config.governor.clone(),
        )
    }

    fn threshold(&self) -> u32 {
        self.config.lockout_threshold.max(1)
    }

    fn threshold_reached(&self) -> bool {
        self.failures >= self.threshold()
    }

    /// Actor this governor tracks.
    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    /// Persistence key of the failure counter.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Current state.
    pub fn state(&self) -> GovernorState {
        GovernorState {
            failure_count: self.failures,
            lockout_threshold: self.threshold(),
            phase: self.phase,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> GovernorPhase {
        self.phase
    }

    /// Pending challenge, if any.
    pub fn challenge(&self) -> Option<&ChallengeState> {
        self.gate.current()
    }

    /// The underlying gate.
    pub fn gate(&self) -> &ChallengeGate<R> {
        &self.gate
    }

    /// Remember the value typed into the challenge field.
    pub fn record_answer(&mut self, answer: u32) -> bool {
        self.gate.record_answer(answer)
    }

    /// Issue a challenge if none is pending. Returns the pending challenge,
    /// or `None` when locked.
    pub fn activate(&mut self) -> Option<ChallengeState> {
        match self.phase {
            GovernorPhase::Locked => None,
            GovernorPhase::ChallengeIssued => self.gate.current().cloned(),
            GovernorPhase::Idle => Some(self.arm()),
        }
    }

    fn arm(&mut self) -> ChallengeState {
        self.phase = GovernorPhase::ChallengeIssued;
        self.gate.issue()
    }

    /// Run one guarded attempt.
    ///
    /// `guarded_action` runs only when the challenge passes and the governor
    /// is not locked.
    pub fn attempt<A, F>(&mut self, answer: A, guarded_action: F) -> AttemptOutcome
    where
        A: ChallengeAnswer,
        F: FnOnce() -> bool,
    {
        match self.phase {
            GovernorPhase::Locked => {
                debug!(actor = self.actor.short(), "attempt rejected while locked");
                return AttemptOutcome::Locked;
            }
            GovernorPhase::Idle => {
                self.arm();
                return AttemptOutcome::NoChallenge;
            }
            GovernorPhase::ChallengeIssued => {}
        }

        if self.gate.verify(answer.numeric()) == Verdict::Incorrect {
            let reason = match answer.numeric() {
                Some(_) => ChallengeFailure::Incorrect,
                None => ChallengeFailure::Unanswered,
            };
            let failures = self.record_failure();
            return AttemptOutcome::ChallengeFailed { reason, failures };
        }

        if guarded_action() {
            self.failures = 0;
            self.persist();
            self.gate.clear();
            self.phase = GovernorPhase::Idle;
            debug!(actor = self.actor.short(), "attempt succeeded");
            AttemptOutcome::Success
        } else {
            let failures = self.record_failure();
            AttemptOutcome::ActionFailed { failures }
        }
    }

    /// Advance the challenge countdown one logical second.
    pub fn tick(&mut self) -> GovernorTick {
        if self.phase != GovernorPhase::ChallengeIssued {
            return GovernorTick::Inactive;
        }
        match self.gate.tick() {
            ChallengeTick::Running(state) => GovernorTick::Running {
                remaining_seconds: state.remaining_seconds,
            },
            // The gate already replaced the expired challenge.
            ChallengeTick::Expired(_) if self.config.expiry_counts_as_failure => {
                let failures = self.count_failure(false);
                GovernorTick::Expired {
                    counted: true,
                    failures,
                    locked: self.phase == GovernorPhase::Locked,
                }
            }
            ChallengeTick::Expired(_) => GovernorTick::Expired {
                counted: false,
                failures: self.failures,
                locked: false,
            },
            ChallengeTick::Inactive => GovernorTick::Inactive,
        }
    }

    /// Clear the counter and start over with a fresh challenge.
    pub fn reset(&mut self) -> ChallengeState {
        let was_locked = self.phase == GovernorPhase::Locked;
        self.failures = 0;
        self.persist();
        self.phase = GovernorPhase::Idle;
        info!(actor = self.actor.short(), was_locked, "governor reset");
        self.arm()
    }

    fn record_failure(&mut self) -> u32 {
        self.count_failure(true)
    }

    fn count_failure(&mut self, reissue: bool) -> u32 {
        self.failures = self.failures.saturating_add(1);
        self.persist();
        if self.threshold_reached() {
            self.gate.clear();
            self.phase = GovernorPhase::Locked;
            info!(
                actor = self.actor.short(),
                failures = self.failures,
                "lockout threshold reached"
            );
        } else {
            if reissue {
                self.gate.issue();
            }
            self.phase = GovernorPhase::ChallengeIssued;
            debug!(
                actor = self.actor.short(),
                failures = self.failures,
                "attempt failed, new challenge issued"
            );
        }
        self.failures
    }

    fn persist(&self) {
        self.store.save_record(
            &self.key,
            &FailureRecord {
                failures: self.failures,
            },
        );
    }
}
