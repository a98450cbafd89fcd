//! Environment abstractions for the preference query.
//!
//! [`PreferenceQuery`] is the capability the bridge reads from: a synchronous
//! read of the current dark-mode preference, plus a subscription to future
//! changes. [`OsPreferenceQuery`] backs it with the OS; [`MockPreferenceQuery`]
//! lets tests drive changes by hand.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::{detect_color_mode, BridgeConfig, BridgeError};

/// A preference change reported by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceChange {
    /// Whether the dark color scheme is now preferred.
    pub matches: bool,
}

impl PreferenceChange {
    pub fn new(matches: bool) -> Self {
        Self { matches }
    }
}

/// Something that can report the dark-mode preference.
pub trait PreferenceQuery {
    /// Whether a dark color scheme is currently preferred.
    fn matches(&self) -> bool;

    /// Starts listening for changes relative to `last_seen`, the value the
    /// caller last observed.
    ///
    /// If the preference no longer equals `last_seen` when the subscription
    /// starts, that difference is reported as the first change.
    fn subscribe(&self, last_seen: bool) -> Result<PreferenceChanges, BridgeError>;
}

impl<Q: PreferenceQuery + ?Sized> PreferenceQuery for &Q {
    fn matches(&self) -> bool {
        (**self).matches()
    }

    fn subscribe(&self, last_seen: bool) -> Result<PreferenceChanges, BridgeError> {
        (**self).subscribe(last_seen)
    }
}

/// A live subscription to preference changes.
///
/// Iterating blocks until the next change and ends once the producer is gone.
/// The sequence cannot be restarted; subscribe again for a new one.
#[derive(Debug)]
pub struct PreferenceChanges {
    rx: Receiver<PreferenceChange>,
    _watcher: Option<WatcherGuard>,
}

impl PreferenceChanges {
    /// Creates a subscription and the sender that feeds it.
    pub fn channel() -> (Sender<PreferenceChange>, Self) {
        let (tx, rx) = mpsc::channel();
        (
            tx,
            Self {
                rx,
                _watcher: None,
            },
        )
    }

    /// Returns the next change if one is already waiting.
    pub fn try_next(&mut self) -> Option<PreferenceChange> {
        self.rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next change.
    pub fn next_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<PreferenceChange, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

impl Iterator for PreferenceChanges {
    type Item = PreferenceChange;

    fn next(&mut self) -> Option<Self::Item> {
        self.rx.recv().ok()
    }
}

// Dropping the sender disconnects the watcher's stop channel, which wakes it
// mid-interval.
#[derive(Debug)]
struct WatcherGuard {
    _stop: Sender<()>,
}

// === Real implementation ===

/// Preference query backed by the OS.
///
/// The OS gives no portable change notification, so each subscription starts
/// a watcher thread that samples [`detect_color_mode`] every `poll_interval`
/// and reports the samples that differ from the previous one.
#[derive(Debug, Clone, Copy)]
pub struct OsPreferenceQuery {
    poll_interval: Duration,
}

impl Default for OsPreferenceQuery {
    fn default() -> Self {
        Self::from_config(&BridgeConfig::default())
    }
}

impl OsPreferenceQuery {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.poll_interval_duration())
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl PreferenceQuery for OsPreferenceQuery {
    fn matches(&self) -> bool {
        detect_color_mode().is_dark()
    }

    fn subscribe(&self, last_seen: bool) -> Result<PreferenceChanges, BridgeError> {
        let (tx, mut changes) = PreferenceChanges::channel();
        let (stop_tx, stop_rx) = mpsc::channel();
        let interval = self.poll_interval;

        thread::Builder::new()
            .name("systheme-watcher".into())
            .spawn(move || watch(interval, last_seen, &tx, &stop_rx))
            .map_err(BridgeError::Watcher)?;

        changes._watcher = Some(WatcherGuard { _stop: stop_tx });
        Ok(changes)
    }
}

/// Samples the detector until the subscriber or the stop channel goes away.
///
/// The first sample is taken immediately so a flip that happened after the
/// caller's own read is reported without waiting a full interval.
fn watch(
    interval: Duration,
    mut last: bool,
    tx: &Sender<PreferenceChange>,
    stop: &Receiver<()>,
) {
    tracing::debug!(?interval, initial = last, "preference watcher started");
    loop {
        let current = detect_color_mode().is_dark();
        if current != last {
            last = current;
            if tx.send(PreferenceChange::new(current)).is_err() {
                break;
            }
        }
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    tracing::debug!("preference watcher stopped");
}

// === Mock implementation for testing ===

#[derive(Debug, Default)]
struct MockState {
    matches: bool,
    subscribers: Vec<Sender<PreferenceChange>>,
}

/// Mock preference query for testing.
///
/// Clones share state, so a test can hand one clone to the bridge and keep
/// another to emit changes.
#[derive(Debug, Clone, Default)]
pub struct MockPreferenceQuery {
    state: Arc<Mutex<MockState>>,
}

impl MockPreferenceQuery {
    /// Create a mock reporting the given initial preference.
    pub fn new(matches: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                matches,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn dark() -> Self {
        Self::new(true)
    }

    pub fn light() -> Self {
        Self::new(false)
    }

    /// Changes the current preference without notifying anyone.
    pub fn set(&self, matches: bool) {
        self.lock().matches = matches;
    }

    /// Changes the current preference and notifies every live subscriber.
    pub fn emit(&self, matches: bool) {
        let mut state = self.lock();
        state.matches = matches;
        state
            .subscribers
            .retain(|tx| tx.send(PreferenceChange::new(matches)).is_ok());
    }

    /// Ends every subscription. Iterators drain what was already emitted,
    /// then stop.
    pub fn close(&self) {
        self.lock().subscribers.clear();
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PreferenceQuery for MockPreferenceQuery {
    fn matches(&self) -> bool {
        self.lock().matches
    }

    fn subscribe(&self, last_seen: bool) -> Result<PreferenceChanges, BridgeError> {
        let (tx, changes) = PreferenceChanges::channel();
        let mut state = self.lock();
        if state.matches != last_seen {
            // The receiver is still held here, so this cannot fail.
            let _ = tx.send(PreferenceChange::new(state.matches));
        }
        state.subscribers.push(tx);
        Ok(changes)
    }
}
