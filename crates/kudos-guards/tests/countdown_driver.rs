//! Countdown driver tests on a paused tokio clock

#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]

use kudos_core::GovernorConfig;
use kudos_guards::{
    AttemptGovernor, AttemptOutcome, ChallengeGate, CountdownDriver, GovernorPhase, GovernorTick,
    SharedGovernor,
};
use kudos_testkit::{actor, memory_store, FixedRandom, MemoryPersistenceHandler};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn shared_governor() -> SharedGovernor<MemoryPersistenceHandler, FixedRandom> {
    let (_, store) = memory_store();
    Arc::new(Mutex::new(AttemptGovernor::new(
        "auth",
        actor(1),
        store,
        ChallengeGate::new(FixedRandom::new(4)),
        GovernorConfig::default(),
    )))
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_second_until_expiry() {
    let governor = shared_governor();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = CountdownDriver::spawn(Arc::clone(&governor), tx);
    assert!(driver.activate().is_some());

    for remaining in (1..10).rev() {
        assert_eq!(
            rx.recv().await,
            Some(GovernorTick::Running {
                remaining_seconds: remaining
            })
        );
    }
    assert_eq!(
        rx.recv().await,
        Some(GovernorTick::Expired {
            counted: true,
            failures: 1,
            locked: false
        })
    );
    assert_eq!(governor.lock().state().failure_count, 1);
}

#[tokio::test(start_paused = true)]
async fn restart_cancels_pending_countdown() {
    let governor = shared_governor();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = CountdownDriver::spawn(Arc::clone(&governor), tx);
    driver.activate();

    assert_eq!(
        rx.recv().await,
        Some(GovernorTick::Running {
            remaining_seconds: 9
        })
    );

    // Half a second in, a wrong answer issues a fresh challenge.
    tokio::time::sleep(Duration::from_millis(500)).await;
    let outcome = governor.lock().attempt(0u32, || true);
    assert!(outcome.is_failure());
    driver.restart();

    // The next tick comes a full period after the restart, against the new
    // challenge, with no leftover tick from the old interval.
    let started = tokio::time::Instant::now();
    assert_eq!(
        rx.recv().await,
        Some(GovernorTick::Running {
            remaining_seconds: 9
        })
    );
    assert_eq!(started.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn idle_ticks_are_not_forwarded() {
    let governor = shared_governor();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = CountdownDriver::spawn(Arc::clone(&governor), tx);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(rx.try_recv().is_err());

    driver.activate();
    assert_eq!(
        rx.recv().await,
        Some(GovernorTick::Running {
            remaining_seconds: 9
        })
    );
}

#[tokio::test(start_paused = true)]
async fn success_returns_governor_to_idle() {
    let governor = shared_governor();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = CountdownDriver::spawn(Arc::clone(&governor), tx);
    let challenge = driver.activate().unwrap();

    rx.recv().await;
    let outcome = governor
        .lock()
        .attempt(challenge.expected_answer, || true);
    assert_eq!(outcome, AttemptOutcome::Success);
    assert_eq!(governor.lock().phase(), GovernorPhase::Idle);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn stop_and_drop_abort_the_task() {
    let governor = shared_governor();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = CountdownDriver::spawn(Arc::clone(&governor), tx);
    driver.activate();
    assert!(driver.is_running());

    driver.stop();
    tokio::task::yield_now().await;
    assert!(!driver.is_running());
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(rx.try_recv().is_err());

    driver.restart();
    assert!(rx.recv().await.is_some());
    drop(driver);

    // The sender lived in the aborted task and the driver, so the channel
    // closes once both are gone.
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn reset_rearms_countdown_after_lockout() {
    let governor = shared_governor();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = CountdownDriver::spawn(Arc::clone(&governor), tx);
    driver.activate();
    for _ in 0..3 {
        governor.lock().attempt(0u32, || true);
    }
    assert_eq!(governor.lock().phase(), GovernorPhase::Locked);
    assert!(driver.activate().is_none());

    let challenge = driver.reset();
    assert_eq!(challenge.remaining_seconds, 10);
    assert_eq!(
        rx.recv().await,
        Some(GovernorTick::Running {
            remaining_seconds: 9
        })
    );
}

#[tokio::test(start_paused = true)]
async fn failed_attempt_restarts_the_countdown() {
    let governor = shared_governor();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = CountdownDriver::spawn(Arc::clone(&governor), tx);
    driver.activate();

    // Just before the first tick, a wrong answer replaces the challenge.
    tokio::time::sleep(Duration::from_millis(950)).await;
    let outcome = driver.attempt(0u32, || true);
    assert!(outcome.is_failure());
    assert_eq!(governor.lock().challenge().unwrap().remaining_seconds, 10);

    // The fresh challenge gets its whole first second.
    let started = tokio::time::Instant::now();
    assert_eq!(
        rx.recv().await,
        Some(GovernorTick::Running {
            remaining_seconds: 9
        })
    );
    assert_eq!(started.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn successful_attempt_through_driver_stops_ticking() {
    let governor = shared_governor();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = CountdownDriver::spawn(Arc::clone(&governor), tx);
    let challenge = driver.activate().unwrap();

    let outcome = driver.attempt(challenge.expected_answer, || true);
    assert_eq!(outcome, AttemptOutcome::Success);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(rx.try_recv().is_err());
}
