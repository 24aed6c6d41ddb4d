//! Time effect handlers

use kudos_core::effects::PhysicalTimeEffects;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Real time handler for production use
#[derive(Debug, Clone, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

impl PhysicalTimeEffects for RealTimeHandler {
    fn physical_time_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }
}

/// Simulated time handler for testing
///
/// Clones share the same clock.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTimeHandler {
    current_time_ms: Arc<AtomicU64>,
}

impl SimulatedTimeHandler {
    /// Create a simulated clock starting at `start_time_ms`
    pub fn new(start_time_ms: u64) -> Self {
        Self {
            current_time_ms: Arc::new(AtomicU64::new(start_time_ms)),
        }
    }

    /// Advance the clock
    pub fn advance_time(&self, duration_ms: u64) {
        self.current_time_ms.fetch_add(duration_ms, Ordering::SeqCst);
    }

    /// Set the absolute time
    pub fn set_time(&self, time_ms: u64) {
        self.current_time_ms.store(time_ms, Ordering::SeqCst);
    }
}

impl PhysicalTimeEffects for SimulatedTimeHandler {
    fn physical_time_ms(&self) -> u64 {
        self.current_time_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_clock_advances() {
        let clock = SimulatedTimeHandler::new(1_700_000_000_000);
        let view = clock.clone();
        clock.advance_time(250);
        assert_eq!(view.physical_time_ms(), 1_700_000_000_250);
        view.set_time(5);
        assert_eq!(clock.physical_time_ms(), 5);
    }

    #[test]
    fn real_clock_is_after_2020() {
        assert!(RealTimeHandler::new().physical_time_ms() > 1_577_836_800_000);
    }
}
