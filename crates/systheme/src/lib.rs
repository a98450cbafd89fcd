//! # systheme - OS color-scheme preference bridge
//!
//! `systheme` forwards the operating system's light/dark preference into an
//! embedding application through one named inbound channel,
//! `systemThemeChanged`. The value is sent once when the host is ready and
//! again on every change.
//!
//! ## Core Concepts
//!
//! - [`ThemePreferenceBridge`]: resolves the channel and reacts to the host's ready signal
//! - [`ThemeListener`]: forwards changes after startup
//! - [`PreferenceQuery`]: current preference plus change subscription
//! - [`HostApplication`] / [`Ports`] / [`ThemeSink`]: the application side
//! - [`ColorMode`]: typed light/dark value, with an overridable OS detector
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use systheme::{
//!     HostApplication, MockPreferenceQuery, Ports, RecordingSink, ThemePreferenceBridge,
//!     SYSTEM_THEME_CHANNEL,
//! };
//!
//! let sink = RecordingSink::new();
//! let host = HostApplication::new()
//!     .with_ports(Ports::new().register(SYSTEM_THEME_CHANNEL, Arc::new(sink.clone())));
//!
//! let query = MockPreferenceQuery::light();
//! let mut listener = ThemePreferenceBridge::from_host(Some(&host))
//!     .on_ready(&query)
//!     .unwrap()
//!     .expect("channel is registered");
//!
//! query.emit(true);
//! listener.forward_pending();
//!
//! assert_eq!(sink.sent(), vec![false, true]);
//! ```
//!
//! ## Missing Host
//!
//! A host that isn't initialized, has no ports, or lacks the channel is not
//! an error. The bridge simply does nothing:
//!
//! ```rust
//! use systheme::{MockPreferenceQuery, ThemePreferenceBridge};
//!
//! let listener = ThemePreferenceBridge::from_host(None)
//!     .on_ready(&MockPreferenceQuery::dark())
//!     .unwrap();
//! assert!(listener.is_none());
//! ```
//!
//! ## Watching the OS
//!
//! [`OsPreferenceQuery`] reads the preference through [`detect_color_mode`]
//! and samples it on a watcher thread. Set `SYSTHEME_MODE=dark|light` or call
//! [`set_theme_detector`] to force a mode.

mod bridge;
mod config;
pub mod env;
mod error;
mod host;
mod mode;

pub use bridge::{ThemeListener, ThemePreferenceBridge};
pub use config::BridgeConfig;
pub use env::{
    MockPreferenceQuery, OsPreferenceQuery, PreferenceChange, PreferenceChanges, PreferenceQuery,
};
pub use error::BridgeError;
pub use host::{HostApplication, Ports, RecordingSink, ThemeSink, SYSTEM_THEME_CHANNEL};
pub use mode::{
    detect_color_mode, reset_theme_detector, set_theme_detector, ColorMode, MODE_ENV_VAR,
};
