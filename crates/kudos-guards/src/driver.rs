//! Wall-clock countdown driver
//!
//! Calls `AttemptGovernor::tick()` once per period on a tokio interval and
//! forwards each non-idle result over an mpsc channel. At most one interval
//! task exists per driver; `restart()` aborts the pending one first so two
//! countdowns never overlap.
//!
//! # Blocking Lock Usage
//!
//! The governor sits behind a `parking_lot::Mutex`. The lock is taken for a
//! single synchronous `tick()` and is never held across an `.await`.

use crate::challenge::{ChallengeAnswer, ChallengeState};
use crate::governor::{AttemptGovernor, AttemptOutcome, GovernorPhase, GovernorTick};
use kudos_core::effects::{PersistenceEffects, RandomEffects};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Governor shared between the UI and the driver task.
pub type SharedGovernor<S, R> = Arc<Mutex<AttemptGovernor<S, R>>>;

/// One logical second.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns the countdown task for one governor.
pub struct CountdownDriver<S, R> {
    governor: SharedGovernor<S, R>,
    period: Duration,
    ticks: mpsc::UnboundedSender<GovernorTick>,
    task: Option<JoinHandle<()>>,
}

impl<S, R> CountdownDriver<S, R>
where
    S: PersistenceEffects + 'static,
    R: RandomEffects + 'static,
{
    /// Start a driver ticking once per second. Must be called inside a tokio
    /// runtime.
    pub fn spawn(
        governor: SharedGovernor<S, R>,
        ticks: mpsc::UnboundedSender<GovernorTick>,
    ) -> Self {
        Self::with_period(governor, DEFAULT_TICK_PERIOD, ticks)
    }

    /// Start a driver with a custom period.
    pub fn with_period(
        governor: SharedGovernor<S, R>,
        period: Duration,
        ticks: mpsc::UnboundedSender<GovernorTick>,
    ) -> Self {
        let mut driver = Self {
            governor,
            period,
            ticks,
            task: None,
        };
        driver.restart();
        driver
    }

    /// Abort the pending interval and start a new one, so the next tick lands
    /// a full period from now.
    pub fn restart(&mut self) {
        self.stop();
        let governor = Arc::clone(&self.governor);
        let ticks = self.ticks.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let tick = governor.lock().tick();
                if tick == GovernorTick::Inactive {
                    continue;
                }
                if ticks.send(tick).is_err() {
                    debug!("countdown receiver dropped, stopping driver");
                    break;
                }
            }
        }));
    }

    /// Activate the governor and restart the countdown for the new
    /// challenge. Returns `None` when the governor is locked.
    pub fn activate(&mut self) -> Option<ChallengeState> {
        let challenge = self.governor.lock().activate();
        if challenge.is_some() {
            self.restart();
        }
        challenge
    }

    /// Forward an attempt to the governor. When the attempt leaves a fresh
    /// challenge behind, its countdown starts a full period from now.
    pub fn attempt<A, F>(&mut self, answer: A, guarded_action: F) -> AttemptOutcome
    where
        A: ChallengeAnswer,
        F: FnOnce() -> bool,
    {
        let (outcome, reissued) = {
            let mut governor = self.governor.lock();
            let before = governor.gate().issued_count();
            let outcome = governor.attempt(answer, guarded_action);
            let reissued = governor.phase() == GovernorPhase::ChallengeIssued
                && governor.gate().issued_count() != before;
            (outcome, reissued)
        };
        if reissued {
            self.restart();
        }
        outcome
    }

    /// Reset the governor and restart the countdown.
    pub fn reset(&mut self) -> ChallengeState {
        let challenge = self.governor.lock().reset();
        self.restart();
        challenge
    }

    /// Abort the countdown task.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the countdown task is alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// The shared governor.
    pub fn governor(&self) -> &SharedGovernor<S, R> {
        &self.governor
    }
}

impl<S, R> Drop for CountdownDriver<S, R> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
