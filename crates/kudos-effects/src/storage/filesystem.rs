//! Filesystem persistence handler
//!
//! One file per key under a base directory. File names are the hex encoding
//! of the key, so arbitrary key characters (`:` in namespaced keys) are safe
//! on every platform. Writes go through a temporary file and a rename so a
//! crash never leaves a half-written record behind.

use kudos_core::effects::{PersistenceEffects, PersistenceError};
use kudos_core::{KudosError, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const RECORD_EXTENSION: &str = "kv";
const TEMP_EXTENSION: &str = "tmp";

/// Configuration for filesystem persistence.
#[derive(Debug, Clone)]
pub struct FilesystemStorageConfig {
    /// Write through a temporary file and rename
    pub atomic_writes: bool,
    /// Largest accepted value in bytes (0 = unlimited)
    pub max_value_size: usize,
}

impl Default for FilesystemStorageConfig {
    fn default() -> Self {
        Self {
            atomic_writes: true,
            max_value_size: 5 * 1024 * 1024, // local storage quota in most browsers
        }
    }
}

/// Filesystem-backed persistence handler.
#[derive(Debug, Clone)]
pub struct FilesystemPersistenceHandler {
    base_path: PathBuf,
    config: FilesystemStorageConfig,
}

impl FilesystemPersistenceHandler {
    /// Create a handler rooted at `base_path` with default configuration.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(base_path, FilesystemStorageConfig::default())
    }

    /// Create a handler rooted at `base_path`, creating the directory if needed.
    pub fn with_config(
        base_path: impl Into<PathBuf>,
        config: FilesystemStorageConfig,
    ) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|e| {
            KudosError::storage(format!(
                "Failed to create storage directory {}: {e}",
                base_path.display()
            ))
        })?;
        info!(path = %base_path.display(), "filesystem persistence ready");
        Ok(Self { base_path, config })
    }

    /// Directory holding the records.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.{RECORD_EXTENSION}", hex::encode(key)))
    }

    fn write_record(&self, path: &Path, value: &str) -> std::io::Result<()> {
        if !self.config.atomic_writes {
            return fs::write(path, value);
        }
        let temp_path = path.with_extension(TEMP_EXTENSION);
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, path)
    }
}

impl PersistenceEffects for FilesystemPersistenceHandler {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PersistenceError::read_failed(key, err.to_string())),
        }
    }

    fn set(&self, key: &str, value: String) -> std::result::Result<(), PersistenceError> {
        if self.config.max_value_size > 0 && value.len() > self.config.max_value_size {
            return Err(PersistenceError::write_failed(
                key,
                format!(
                    "value of {} bytes exceeds limit of {} bytes",
                    value.len(),
                    self.config.max_value_size
                ),
            ));
        }
        let path = self.record_path(key);
        self.write_record(&path, &value)
            .map_err(|e| PersistenceError::write_failed(key, e.to_string()))?;
        debug!(key, bytes = value.len(), "record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> std::result::Result<bool, PersistenceError> {
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(PersistenceError::write_failed(key, err.to_string())),
        }
    }
}
