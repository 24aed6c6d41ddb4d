//! Kudos Effects - Handler Layer
//!
//! Concrete implementations of the effect traits defined in `kudos-core`:
//!
//! - Persistence: `MemoryPersistenceHandler`, `FilesystemPersistenceHandler`
//! - Randomness: `RealRandomHandler`, `SeededRandomHandler`
//! - Time: `RealTimeHandler`, `SimulatedTimeHandler`
//! - Logging: `init_tracing`
//!
//! This is the only crate allowed to touch the system clock and the thread
//! RNG directly; everything else reaches them through the traits.

pub mod logging;
pub mod random;
pub mod storage;
pub mod time;

pub use logging::init_tracing;
pub use random::{RealRandomHandler, SeededRandomHandler};
pub use storage::{FilesystemPersistenceHandler, MemoryPersistenceHandler};
pub use time::{RealTimeHandler, SimulatedTimeHandler};
