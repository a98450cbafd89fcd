//! Bridge configuration.
//!
//! ```yaml
//! channel: systemThemeChanged
//! poll_interval_ms: 500
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{BridgeError, SYSTEM_THEME_CHANNEL};

const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Settings for the bridge and the OS preference watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Name of the inbound channel the preference is sent through.
    pub channel: String,
    /// How often the OS watcher samples the preference.
    pub poll_interval_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel: SYSTEM_THEME_CHANNEL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the channel name.
    pub fn channel(mut self, name: impl Into<String>) -> Self {
        self.channel = name.into();
        self
    }

    /// Sets the watcher poll interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parses and validates a YAML config. Missing keys take their defaults.
    pub fn from_yaml(source: &str) -> Result<Self, BridgeError> {
        let config: BridgeConfig = if source.trim().is_empty() {
            BridgeConfig::default()
        } else {
            serde_yaml::from_str(source)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML config from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.channel.trim().is_empty() {
            return Err(BridgeError::EmptyChannel);
        }
        if self.poll_interval_ms == 0 {
            return Err(BridgeError::InvalidPollInterval);
        }
        Ok(())
    }
}
