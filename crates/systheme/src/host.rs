//! The host application handle and its inbound channels.
//!
//! An embedding application exposes a collection of named inbound channels
//! ([`Ports`]). The bridge only ever uses one of them, the
//! [`SYSTEM_THEME_CHANNEL`], and only through [`ThemeSink::send`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Name of the channel the preference is delivered through.
pub const SYSTEM_THEME_CHANNEL: &str = "systemThemeChanged";

/// An inbound channel that accepts a dark-mode preference.
pub trait ThemeSink: Send + Sync {
    /// Delivers one preference value. `true` means dark.
    fn send(&self, dark: bool);
}

impl<F> ThemeSink for F
where
    F: Fn(bool) + Send + Sync,
{
    fn send(&self, dark: bool) {
        self(dark)
    }
}

/// Named inbound channels exposed by a host application.
#[derive(Default, Clone)]
pub struct Ports {
    channels: BTreeMap<String, Arc<dyn ThemeSink>>,
}

impl Ports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a channel, replacing any channel with the same name.
    pub fn register(mut self, name: impl Into<String>, sink: Arc<dyn ThemeSink>) -> Self {
        self.channels.insert(name.into(), sink);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ThemeSink>> {
        self.channels.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl fmt::Debug for Ports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Handle to an initialized embedding application.
///
/// A freshly constructed host exposes no channels at all, which is the
/// state of an application that hasn't wired up its ports yet.
#[derive(Debug, Default, Clone)]
pub struct HostApplication {
    ports: Option<Ports>,
}

impl HostApplication {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ports(mut self, ports: Ports) -> Self {
        self.ports = Some(ports);
        self
    }

    pub fn ports(&self) -> Option<&Ports> {
        self.ports.as_ref()
    }

    /// Looks up a channel by name. `None` if the host has no ports or the
    /// channel isn't registered.
    pub fn channel(&self, name: &str) -> Option<Arc<dyn ThemeSink>> {
        self.ports.as_ref()?.get(name)
    }
}

/// Sink that records every value it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<bool>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values received so far.
    pub fn sent(&self) -> Vec<bool> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl ThemeSink for RecordingSink {
    fn send(&self, dark: bool) {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).push(dark);
    }
}
