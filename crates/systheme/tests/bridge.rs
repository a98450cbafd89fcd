//! Integration tests for the theme preference bridge.
//!
//! These drive the bridge through mock hosts and preference queries, plus a
//! couple of runs against the OS-backed query with a forced detector.

use proptest::prelude::*;
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use systheme::{
    reset_theme_detector, set_theme_detector, ColorMode, HostApplication, MockPreferenceQuery,
    OsPreferenceQuery, Ports, RecordingSink, ThemePreferenceBridge, SYSTEM_THEME_CHANNEL,
};

fn connected_host(sink: &RecordingSink) -> HostApplication {
    HostApplication::new()
        .with_ports(Ports::new().register(SYSTEM_THEME_CHANNEL, Arc::new(sink.clone())))
}

// ============================================================================
// Startup and changes
// ============================================================================

#[test]
fn no_host_sends_nothing() {
    let query = MockPreferenceQuery::dark();

    let listener = ThemePreferenceBridge::from_host(None)
        .on_ready(&query)
        .unwrap();

    assert!(listener.is_none());
    query.emit(false);
    assert_eq!(query.subscriber_count(), 0);
}

#[test]
fn startup_sends_light_preference() {
    let sink = RecordingSink::new();
    let query = MockPreferenceQuery::light();

    ThemePreferenceBridge::from_host(Some(&connected_host(&sink)))
        .on_ready(&query)
        .unwrap()
        .unwrap();

    assert_eq!(sink.sent(), vec![false]);
}

#[test]
fn change_is_forwarded_after_startup() {
    let sink = RecordingSink::new();
    let query = MockPreferenceQuery::light();

    let listener = ThemePreferenceBridge::from_host(Some(&connected_host(&sink)))
        .on_ready(&query)
        .unwrap()
        .unwrap();

    query.emit(true);
    query.close();

    assert_eq!(listener.run(), 1);
    assert_eq!(sink.sent(), vec![false, true]);
}

#[test]
fn changes_are_forwarded_in_order() {
    let sink = RecordingSink::new();
    let query = MockPreferenceQuery::light();

    let listener = ThemePreferenceBridge::from_host(Some(&connected_host(&sink)))
        .on_ready(&query)
        .unwrap()
        .unwrap();

    query.emit(true);
    query.emit(false);
    query.emit(true);
    query.close();

    assert_eq!(listener.run(), 3);
    assert_eq!(sink.sent(), vec![false, true, false, true]);
}

// ============================================================================
// Guard
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum HostState {
    Absent,
    NoPorts,
    OtherChannel,
    Connected,
}

fn build_host(state: HostState, sink: &RecordingSink) -> Option<HostApplication> {
    match state {
        HostState::Absent => None,
        HostState::NoPorts => Some(HostApplication::new()),
        HostState::OtherChannel => Some(
            HostApplication::new()
                .with_ports(Ports::new().register("themeChanged", Arc::new(sink.clone()))),
        ),
        HostState::Connected => Some(connected_host(sink)),
    }
}

#[test]
fn guard_only_passes_with_full_chain() {
    for state in [
        HostState::Absent,
        HostState::NoPorts,
        HostState::OtherChannel,
        HostState::Connected,
    ] {
        let sink = RecordingSink::new();
        let query = MockPreferenceQuery::dark();
        let host = build_host(state, &sink);

        let listener = ThemePreferenceBridge::from_host(host.as_ref())
            .on_ready(&query)
            .unwrap();

        let connected = matches!(state, HostState::Connected);
        assert_eq!(listener.is_some(), connected, "{:?}", state);
        assert_eq!(sink.count(), usize::from(connected), "{:?}", state);
    }
}

#[test]
fn guard_failure_is_repeatable() {
    let query = MockPreferenceQuery::dark();
    let host = HostApplication::new();

    for _ in 0..3 {
        let result = ThemePreferenceBridge::from_host(Some(&host)).on_ready(&query);
        assert!(matches!(result, Ok(None)));
    }
    assert_eq!(query.subscriber_count(), 0);
}

#[test]
fn startup_reads_value_at_ready_time() {
    let sink = RecordingSink::new();
    let query = MockPreferenceQuery::light();
    let bridge = ThemePreferenceBridge::from_host(Some(&connected_host(&sink)));

    // Changes before the ready signal are not forwarded on their own.
    query.emit(true);
    query.set(false);
    query.set(true);

    let mut listener = bridge.on_ready(&query).unwrap().unwrap();
    assert_eq!(listener.forward_pending(), 0);
    assert_eq!(sink.sent(), vec![true]);
}

// ============================================================================
// Threads
// ============================================================================

#[test]
fn spawned_listener_forwards_until_closed() {
    let sink = RecordingSink::new();
    let query = MockPreferenceQuery::dark();

    let handle = ThemePreferenceBridge::from_host(Some(&connected_host(&sink)))
        .on_ready(&query)
        .unwrap()
        .unwrap()
        .spawn()
        .unwrap();

    query.emit(false);
    query.emit(true);
    query.close();

    assert_eq!(handle.join().unwrap(), 2);
    assert_eq!(sink.sent(), vec![true, false, true]);
}

#[test]
#[serial]
fn os_query_forwards_detector_changes() {
    set_theme_detector(|| ColorMode::Dark);

    let sink = RecordingSink::new();
    let query = OsPreferenceQuery::new(Duration::from_millis(5));
    let mut listener = ThemePreferenceBridge::from_host(Some(&connected_host(&sink)))
        .on_ready(&query)
        .unwrap()
        .unwrap();
    assert_eq!(sink.sent(), vec![true]);

    set_theme_detector(|| ColorMode::Light);

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while listener.forwarded() == 0 && std::time::Instant::now() < deadline {
        listener.forward_pending();
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(sink.sent(), vec![true, false]);
    reset_theme_detector();
}

static DETECTOR_CALLS: AtomicUsize = AtomicUsize::new(0);

// Light on the first read, dark on every read after it.
fn flips_after_first_read() -> ColorMode {
    if DETECTOR_CALLS.fetch_add(1, Ordering::SeqCst) == 0 {
        ColorMode::Light
    } else {
        ColorMode::Dark
    }
}

#[test]
#[serial]
fn os_flip_between_startup_read_and_subscribe_is_forwarded() {
    DETECTOR_CALLS.store(0, Ordering::SeqCst);
    set_theme_detector(flips_after_first_read);

    let sink = RecordingSink::new();
    let query = OsPreferenceQuery::new(Duration::from_millis(5));
    let mut listener = ThemePreferenceBridge::from_host(Some(&connected_host(&sink)))
        .on_ready(&query)
        .unwrap()
        .unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while listener.forwarded() == 0 && std::time::Instant::now() < deadline {
        listener.forward_pending();
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(sink.sent(), vec![false, true]);
    reset_theme_detector();
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn changes_are_forwarded_verbatim(
        initial: bool,
        changes in prop::collection::vec(any::<bool>(), 0..32),
    ) {
        let sink = RecordingSink::new();
        let query = MockPreferenceQuery::new(initial);

        let listener = ThemePreferenceBridge::from_host(Some(&connected_host(&sink)))
            .on_ready(&query)
            .unwrap()
            .unwrap();

        for &dark in &changes {
            query.emit(dark);
        }
        query.close();

        prop_assert_eq!(listener.run(), changes.len());

        let sent = sink.sent();
        prop_assert_eq!(sent[0], initial);
        prop_assert_eq!(&sent[1..], changes.as_slice());
    }
}
