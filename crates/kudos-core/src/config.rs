//! Configuration for Kudos components
//!
//! Loaded from TOML, optionally overridden from `KUDOS_*` environment
//! variables, then validated. Every section has defaults matching the
//! behavior of the portfolio widgets this workspace replaces: a 10 second
//! challenge over operands 1..=10 and lockout after 3 failures.

use crate::errors::{KudosError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "KUDOS_";

/// Timed arithmetic challenge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Seconds a challenge stays valid before it is reissued
    pub budget_seconds: u32,
    /// Smallest operand value (inclusive)
    pub operand_min: u32,
    /// Largest operand value (inclusive)
    pub operand_max: u32,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            budget_seconds: 10,
            operand_min: 1,
            operand_max: 10,
        }
    }
}

/// Attempt governor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Consecutive failures that trip lockout
    pub lockout_threshold: u32,
    /// Whether a challenge expiring unanswered counts as a failed attempt
    pub expiry_counts_as_failure: bool,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            lockout_threshold: 3,
            expiry_counts_as_failure: true,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive (`RUST_LOG` takes precedence)
    pub level: String,
    /// Emit ANSI colors
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KudosConfig {
    /// Namespace used for persisted keys of the governor and default ledger
    pub namespace: String,
    /// Challenge gate settings
    pub challenge: ChallengeConfig,
    /// Attempt governor settings
    pub governor: GovernorConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for KudosConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            challenge: ChallengeConfig::default(),
            governor: GovernorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl KudosConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| KudosError::config(format!("Invalid TOML: {e}")))
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KudosError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply `KUDOS_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply overrides from an explicit variable list.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "NAMESPACE" => self.namespace = value,
                "LOCKOUT_THRESHOLD" => {
                    self.governor.lockout_threshold = parse_var(&key, &value)?;
                }
                "EXPIRY_COUNTS_AS_FAILURE" => {
                    self.governor.expiry_counts_as_failure = parse_var(&key, &value)?;
                }
                "CHALLENGE_BUDGET_SECONDS" => {
                    self.challenge.budget_seconds = parse_var(&key, &value)?;
                }
                "LOG_LEVEL" => self.logging.level = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(KudosError::invalid("namespace must not be empty"));
        }
        if self.governor.lockout_threshold == 0 {
            return Err(KudosError::invalid("lockout_threshold must be at least 1"));
        }
        if self.challenge.budget_seconds == 0 {
            return Err(KudosError::invalid("budget_seconds must be at least 1"));
        }
        if self.challenge.operand_min == 0 {
            return Err(KudosError::invalid("operand_min must be positive"));
        }
        if self.challenge.operand_min > self.challenge.operand_max {
            return Err(KudosError::invalid(format!(
                "operand_min ({}) exceeds operand_max ({})",
                self.challenge.operand_min, self.challenge.operand_max
            )));
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| KudosError::config(format!("{key}={value}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = KudosConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.governor.lockout_threshold, 3);
        assert_eq!(config.challenge.budget_seconds, 10);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = KudosConfig::from_toml_str(
            r#"
            namespace = "auth"

            [governor]
            lockout_threshold = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.namespace, "auth");
        assert_eq!(config.governor.lockout_threshold, 5);
        assert!(config.governor.expiry_counts_as_failure);
        assert_eq!(config.challenge, ChallengeConfig::default());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = KudosConfig::default();
        config
            .merge_with_vars(vec![
                ("KUDOS_LOCKOUT_THRESHOLD".to_string(), "4".to_string()),
                ("KUDOS_LOG_LEVEL".to_string(), "debug".to_string()),
                ("OTHER_VAR".to_string(), "ignored".to_string()),
            ])
            .unwrap();
        assert_eq!(config.governor.lockout_threshold, 4);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn bad_env_value_is_config_error() {
        let mut config = KudosConfig::default();
        let err = config
            .merge_with_vars(vec![(
                "KUDOS_CHALLENGE_BUDGET_SECONDS".to_string(),
                "soon".to_string(),
            )])
            .unwrap_err();
        assert!(matches!(err, KudosError::Config { .. }));
    }

    #[test]
    fn validation_rejects_inverted_operands() {
        let mut config = KudosConfig::default();
        config.challenge.operand_min = 9;
        config.challenge.operand_max = 2;
        assert!(config.validate().is_err());

        config = KudosConfig::default();
        config.governor.lockout_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[challenge]\nbudget_seconds = 30").unwrap();
        let config = KudosConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.challenge.budget_seconds, 30);
    }
}
