//! Tracing subscriber setup
//!
//! Library crates only emit `tracing` events. Binaries and test harnesses
//! call `init_tracing` once to install a formatter; `RUST_LOG` overrides the
//! configured level when set.

use kudos_core::{KudosError, LoggingConfig, Result};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// Returns `Ok(false)` if a global subscriber was already installed, which
/// is the normal case when several tests initialize logging.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| KudosError::config(format!("Invalid log level {:?}: {e}", config.level)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = LoggingConfig {
            level: "kudos=debug".to_string(),
            ansi: false,
        };
        assert!(init_tracing(&config).is_ok());
        assert_eq!(init_tracing(&config).ok(), Some(false));
    }
}
