//! Setup flow configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid:
//!
//! ```toml
//! [polling]
//! interval_ms = 30000
//! max_duration_secs = 259200
//!
//! [transfer]
//! advance_on_unknown_lock_status = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// DNS propagation can take up to 72 hours
const DEFAULT_MAX_POLL_SECS: u64 = 72 * 60 * 60;
const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    pub polling: PollingConfig,
    pub transfer: TransferConfig,
}

/// Verification polling cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Milliseconds between verification attempts
    pub interval_ms: u64,
    /// Whole seconds after which polling gives up
    pub max_duration_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_duration_secs: DEFAULT_MAX_POLL_SECS,
        }
    }
}

/// Transfer sub-flow behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Leave the unlock step when the registrar reports no lock status
    pub advance_on_unknown_lock_status: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            advance_on_unknown_lock_status: true,
        }
    }
}

impl SetupConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.polling.interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_poll_duration(mut self, max: Duration) -> Self {
        self.polling.max_duration_secs = max.as_secs();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_advance_on_unknown_lock(mut self, advance: bool) -> Self {
        self.transfer.advance_on_unknown_lock_status = advance;
        self
    }

    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    #[inline]
    #[must_use]
    pub fn max_poll_duration(&self) -> Duration {
        Duration::from_secs(self.polling.max_duration_secs)
    }

    /// Reject settings the poller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::Invalid("polling.interval_ms must be positive".into()));
        }
        if self.max_poll_duration() < self.poll_interval() {
            return Err(ConfigError::Invalid(
                "polling.max_duration_secs must cover at least one polling.interval_ms".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_propagation_window() {
        let config = SetupConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.max_poll_duration(), Duration::from_secs(259_200));
        assert!(config.transfer.advance_on_unknown_lock_status);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(SetupConfig::from_toml_str("").unwrap(), SetupConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = SetupConfig::from_toml_str("[polling]\ninterval_ms = 10000\n").unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.polling.max_duration_secs, DEFAULT_MAX_POLL_SECS);
    }

    #[test]
    fn zero_interval_is_invalid() {
        let err = SetupConfig::from_toml_str("[polling]\ninterval_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn sub_second_interval_is_kept() {
        let config = SetupConfig::default().with_poll_interval(Duration::from_millis(500));
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SetupConfig::from_toml_str("[polling\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
