//! Persistence handlers

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemPersistenceHandler;
pub use memory::MemoryPersistenceHandler;
