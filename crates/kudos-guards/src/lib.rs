//! Kudos Guards - Challenge and Lockout Layer
//!
//! - `ChallengeGate`: timed two-operand arithmetic challenge on a logical clock
//! - `AttemptGovernor`: runs a caller-supplied guarded action behind the gate
//!   and a persisted consecutive-failure counter, locking out at a threshold
//! - `CountdownDriver`: tokio task that ticks a shared governor once a second
//! - `PasswordPolicy`: strength tips for signup flows
//!
//! None of this is a security control. The challenge is a low-assurance human
//! check and the lockout lives in client-side storage.

pub mod challenge;
pub mod driver;
pub mod governor;
pub mod password;

pub use challenge::{ChallengeAnswer, ChallengeGate, ChallengeState, ChallengeTick, Verdict};
pub use driver::{CountdownDriver, SharedGovernor, DEFAULT_TICK_PERIOD};
pub use governor::{
    AttemptGovernor, AttemptOutcome, ChallengeFailure, GovernorPhase, GovernorState, GovernorTick,
};
pub use password::{PasswordPolicy, PasswordTip};
