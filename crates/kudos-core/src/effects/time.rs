//! Wall-clock interface.
//!
//! Only identity issuance reads the wall clock. Challenge countdowns run on
//! logical ticks and never consult this trait.

use std::sync::Arc;

/// Physical (wall-clock) time source.
pub trait PhysicalTimeEffects: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn physical_time_ms(&self) -> u64;
}

impl<T: PhysicalTimeEffects + ?Sized> PhysicalTimeEffects for Arc<T> {
    fn physical_time_ms(&self) -> u64 {
        (**self).physical_time_ms()
    }
}
