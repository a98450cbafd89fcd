//! Error types for configuration and watcher setup.
//!
//! The bridge's own guard never produces one of these: a missing host or
//! channel is a normal state, not a failure.

use std::io;

/// Errors raised around the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Failed to read a configuration file.
    #[error("Failed to read config: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be parsed.
    #[error("Invalid config: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Poll interval must be positive.
    #[error("Poll interval must be greater than zero.")]
    InvalidPollInterval,

    /// Channel name must not be empty.
    #[error("Channel name must not be empty.")]
    EmptyChannel,

    /// Unrecognized color mode name.
    #[error("Unknown color mode '{0}'. Expected 'light' or 'dark'.")]
    InvalidMode(String),

    /// The OS preference watcher thread could not be started.
    #[error("Failed to start preference watcher: {0}")]
    Watcher(#[source] io::Error),

    /// The listener thread could not be started.
    #[error("Failed to start theme listener: {0}")]
    Listener(#[source] io::Error),
}
