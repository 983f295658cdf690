// src/display/tests.rs

use super::mock::MockDisplaySource;
use super::*;
use std::sync::Mutex;

struct RecordingListener {
    events: Mutex<Vec<DisplayEvent>>,
}

impl RecordingListener {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    fn events(&self) -> Vec<DisplayEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl DisplayListener for RecordingListener {
    fn on_display_event(&self, event: DisplayEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[test_log::test]
fn subscribe_delivers_events_until_unsubscribed() {
    let source = MockDisplaySource::new();
    let listener = RecordingListener::new();

    let subscription = source.subscribe(listener.clone());
    source.notify_changed(DisplayId(1));
    source.notify_added(DisplayId(2));

    source.unsubscribe(subscription);
    source.notify_changed(DisplayId(1));

    assert_eq!(
        listener.events(),
        vec![
            DisplayEvent::Changed(DisplayId(1)),
            DisplayEvent::Added(DisplayId(2)),
        ]
    );
}

#[test_log::test]
fn query_reflects_state_mutations() {
    let source = MockDisplaySource::new();
    let id = DisplayId(3);
    source.add_display(
        id,
        DisplaySnapshot {
            power: PowerState::Off,
            refresh_rate: 60.0,
            supported_refresh_rates: vec![60.0, 120.0],
        },
    );

    source.set_power(id, PowerState::On);
    source.set_refresh_rate(id, 120.0);

    let snapshot = source.query(id).unwrap();
    assert!(snapshot.power.is_on());
    assert_eq!(snapshot.refresh_rate, 120.0);

    source.remove_display(id);
    assert!(source.query(id).is_none());
}

#[test_log::test]
fn peak_refresh_rate_is_max_over_modes() {
    let snapshot = DisplaySnapshot {
        power: PowerState::Dozing,
        refresh_rate: 60.0,
        supported_refresh_rates: vec![90.0, 120.0, 60.0],
    };
    assert_eq!(snapshot.peak_refresh_rate(), 120.0);

    let empty = DisplaySnapshot {
        power: PowerState::Off,
        refresh_rate: 0.0,
        supported_refresh_rates: Vec::new(),
    };
    assert_eq!(empty.peak_refresh_rate(), 0.0);
}
