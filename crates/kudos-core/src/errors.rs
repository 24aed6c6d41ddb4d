//! Infrastructure error type
//!
//! Domain rejections (duplicate comments, wrong challenge answers) are not
//! errors in this sense; they are reported through the feature crates' own
//! result types. `KudosError` covers configuration, serialization and handler
//! construction failures.

use thiserror::Error;

/// Errors from Kudos infrastructure operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KudosError {
    /// Invalid input or configuration value.
    #[error("Invalid: {message}")]
    Invalid {
        /// Description of what was invalid
        message: String,
    },

    /// Configuration could not be loaded or parsed.
    #[error("Config error: {message}")]
    Config {
        /// Description of the configuration failure
        message: String,
    },

    /// Record could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure
        message: String,
    },

    /// Persistence backend failure.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },
}

impl KudosError {
    /// Create an invalid-input error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for KudosError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<crate::effects::PersistenceError> for KudosError {
    fn from(err: crate::effects::PersistenceError) -> Self {
        Self::storage(err.to_string())
    }
}

/// Result alias for infrastructure operations.
pub type Result<T> = std::result::Result<T, KudosError>;
