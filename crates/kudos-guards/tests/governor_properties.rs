//! Property tests for the attempt governor state machine

#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]

use kudos_core::GovernorConfig;
use kudos_effects::SeededRandomHandler;
use kudos_guards::{AttemptGovernor, AttemptOutcome, ChallengeGate, GovernorPhase};
use kudos_testkit::strategies::arb_actor;
use kudos_testkit::{memory_store, reopen};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Step {
    WrongAnswer,
    RightAnswerRejected,
    RightAnswerAccepted,
    Reset,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => Just(Step::WrongAnswer),
        2 => Just(Step::RightAnswerRejected),
        2 => Just(Step::RightAnswerAccepted),
        1 => Just(Step::Reset),
    ]
}

proptest! {
    /// The governor is locked exactly when `threshold` failures happened
    /// since the last success or reset, and a locked governor never runs the
    /// guarded action.
    #[test]
    fn lockout_tracks_consecutive_failures(
        threshold in 1u32..5,
        seed in any::<u64>(),
        actor in arb_actor(),
        steps in prop::collection::vec(arb_step(), 0..40),
    ) {
        let (backend, store) = memory_store();
        let mut governor = AttemptGovernor::new(
            "auth",
            actor.clone(),
            store,
            ChallengeGate::new(SeededRandomHandler::with_seed(seed)),
            GovernorConfig { lockout_threshold: threshold, ..GovernorConfig::default() },
        );
        governor.activate();
        let mut consecutive = 0u32;

        for step in steps {
            let locked = governor.phase() == GovernorPhase::Locked;
            prop_assert_eq!(locked, consecutive >= threshold);

            let expected = governor.challenge().map(|c| c.expected_answer);
            let mut ran = false;
            let outcome = match (step, expected) {
                (Step::Reset, _) => {
                    governor.reset();
                    consecutive = 0;
                    continue;
                }
                (Step::WrongAnswer, _) => {
                    governor.attempt(expected.map_or(0, |e| e + 1), || { ran = true; true })
                }
                (Step::RightAnswerRejected, Some(answer)) => {
                    governor.attempt(answer, || { ran = true; false })
                }
                (Step::RightAnswerAccepted, Some(answer)) => {
                    governor.attempt(answer, || { ran = true; true })
                }
                // Locked: no challenge to read, any answer will do.
                (_, None) => governor.attempt(0u32, || { ran = true; true }),
            };

            if locked {
                prop_assert_eq!(outcome, AttemptOutcome::Locked);
                prop_assert!(!ran);
                continue;
            }
            match outcome {
                AttemptOutcome::Success => {
                    consecutive = 0;
                    governor.activate();
                }
                AttemptOutcome::ChallengeFailed { failures, .. } => {
                    prop_assert!(!ran);
                    consecutive += 1;
                    prop_assert_eq!(failures, consecutive);
                }
                AttemptOutcome::ActionFailed { failures } => {
                    prop_assert!(ran);
                    consecutive += 1;
                    prop_assert_eq!(failures, consecutive);
                }
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            }
        }

        // Whatever happened, a reload agrees on the counter.
        let resumed = AttemptGovernor::new(
            "auth",
            actor,
            reopen(&backend),
            ChallengeGate::new(SeededRandomHandler::with_seed(seed)),
            GovernorConfig { lockout_threshold: threshold, ..GovernorConfig::default() },
        );
        prop_assert_eq!(resumed.state().failure_count, governor.state().failure_count);
        prop_assert_eq!(resumed.state().locked(), governor.phase() == GovernorPhase::Locked);
    }
}
