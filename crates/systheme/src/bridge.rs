//! The theme preference bridge.
//!
//! When the host signals readiness, the bridge sends the current dark-mode
//! preference once through the host's `systemThemeChanged` channel, then
//! forwards every later change through the same channel.
//!
//! ```text
//! on_ready(query)
//! ├── no host / no ports / no channel → None (nothing sent)
//! └── channel found
//!     ├── send(query.matches())        ← startup value
//!     ├── query.subscribe(sent value)
//!     └── ThemeListener: send(change.matches) for each change
//! ```
//!
//! The bridge never caches, filters or reorders values. Each send carries the
//! value the environment reported at that moment.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::env::{PreferenceChanges, PreferenceQuery};
use crate::host::{HostApplication, ThemeSink, SYSTEM_THEME_CHANNEL};
use crate::{BridgeConfig, BridgeError};

/// Relays the OS dark-mode preference into an application channel.
///
/// Built from an optional sink: a bridge without one is inert and
/// [`on_ready`](Self::on_ready) does nothing.
#[derive(Clone)]
pub struct ThemePreferenceBridge {
    sink: Option<Arc<dyn ThemeSink>>,
}

impl ThemePreferenceBridge {
    /// Creates a bridge that sends through `sink`, if any.
    pub fn new(sink: Option<Arc<dyn ThemeSink>>) -> Self {
        Self { sink }
    }

    /// Resolves the `systemThemeChanged` channel on `host`.
    pub fn from_host(host: Option<&HostApplication>) -> Self {
        Self::from_host_channel(host, SYSTEM_THEME_CHANNEL)
    }

    /// Resolves the channel named by `config` on `host`.
    pub fn from_config(host: Option<&HostApplication>, config: &BridgeConfig) -> Self {
        Self::from_host_channel(host, &config.channel)
    }

    /// Resolves `channel` on `host`. Any missing piece leaves the bridge inert.
    pub fn from_host_channel(host: Option<&HostApplication>, channel: &str) -> Self {
        Self::new(host.and_then(|host| host.channel(channel)))
    }

    /// Whether a channel was resolved.
    pub fn is_connected(&self) -> bool {
        self.sink.is_some()
    }

    /// Handles the host's one-time ready signal.
    ///
    /// Returns `Ok(None)` without touching `query` when no channel was
    /// resolved. Otherwise sends the current preference, subscribes to
    /// changes, and returns the listener that forwards them. Errors come
    /// only from the query's own subscription.
    pub fn on_ready<Q>(self, query: &Q) -> Result<Option<ThemeListener>, BridgeError>
    where
        Q: PreferenceQuery + ?Sized,
    {
        let Some(sink) = self.sink else {
            tracing::trace!("no theme channel on host, bridge inactive");
            return Ok(None);
        };

        let dark = query.matches();
        tracing::debug!(dark, "sending startup theme preference");
        sink.send(dark);

        // Baseline is the value just sent, so a flip since the read above
        // still arrives as a change.
        let changes = query.subscribe(dark)?;
        Ok(Some(ThemeListener {
            sink,
            changes,
            forwarded: 0,
        }))
    }
}

impl fmt::Debug for ThemePreferenceBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemePreferenceBridge")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Forwards preference changes to the channel.
///
/// Owns the subscription; it lives as long as the listener does.
pub struct ThemeListener {
    sink: Arc<dyn ThemeSink>,
    changes: PreferenceChanges,
    forwarded: usize,
}

impl ThemeListener {
    /// Number of changes forwarded so far. The startup send isn't counted.
    pub fn forwarded(&self) -> usize {
        self.forwarded
    }

    /// Forwards the changes already waiting, without blocking.
    ///
    /// Returns how many were forwarded by this call.
    pub fn forward_pending(&mut self) -> usize {
        let mut count = 0;
        while let Some(change) = self.changes.try_next() {
            self.forward(change.matches);
            count += 1;
        }
        count
    }

    /// Forwards changes until the subscription ends.
    ///
    /// Returns the total number of changes forwarded.
    pub fn run(mut self) -> usize {
        while let Some(change) = self.changes.next() {
            self.forward(change.matches);
        }
        tracing::debug!(forwarded = self.forwarded, "theme subscription ended");
        self.forwarded
    }

    /// Moves the listener onto its own thread and runs it there.
    pub fn spawn(self) -> Result<JoinHandle<usize>, BridgeError> {
        thread::Builder::new()
            .name("systheme-listener".into())
            .spawn(move || self.run())
            .map_err(BridgeError::Listener)
    }

    fn forward(&mut self, dark: bool) {
        tracing::trace!(dark, "forwarding theme preference change");
        self.sink.send(dark);
        self.forwarded += 1;
    }
}

impl fmt::Debug for ThemeListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeListener")
            .field("forwarded", &self.forwarded)
            .finish_non_exhaustive()
    }
}
