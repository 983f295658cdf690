// src/display/mock.rs

//! In-memory display state source for tests and the demo binary.
//!
//! State mutation and event notification are separate steps so tests can
//! stage exact orderings (e.g. an event queued for a request that has since
//! been torn down).

use crate::display::{
    DisplayEvent, DisplayId, DisplayListener, DisplaySnapshot, DisplayStateSource, PowerState,
    SubscriptionId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    displays: HashMap<DisplayId, DisplaySnapshot>,
    listeners: HashMap<u64, Arc<dyn DisplayListener>>,
    next_subscription: u64,
}

/// Scriptable [`DisplayStateSource`] backed by an in-memory snapshot table.
#[derive(Default)]
pub struct MockDisplaySource {
    inner: Mutex<Inner>,
}

impl MockDisplaySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a display.
    pub fn add_display(&self, id: DisplayId, snapshot: DisplaySnapshot) {
        self.inner.lock().unwrap().displays.insert(id, snapshot);
    }

    pub fn remove_display(&self, id: DisplayId) {
        self.inner.lock().unwrap().displays.remove(&id);
    }

    pub fn set_power(&self, id: DisplayId, power: PowerState) {
        if let Some(snapshot) = self.inner.lock().unwrap().displays.get_mut(&id) {
            snapshot.power = power;
        }
    }

    pub fn set_refresh_rate(&self, id: DisplayId, rate: f32) {
        if let Some(snapshot) = self.inner.lock().unwrap().displays.get_mut(&id) {
            snapshot.refresh_rate = rate;
        }
    }

    /// Deliver `Changed(id)` to every current listener.
    pub fn notify_changed(&self, id: DisplayId) {
        self.notify(DisplayEvent::Changed(id));
    }

    pub fn notify_added(&self, id: DisplayId) {
        self.notify(DisplayEvent::Added(id));
    }

    pub fn notify_removed(&self, id: DisplayId) {
        self.notify(DisplayEvent::Removed(id));
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().unwrap().listeners.len()
    }

    fn notify(&self, event: DisplayEvent) {
        // Snapshot the listener set first; delivery happens outside the lock
        // so a listener may call back into the source.
        let listeners: Vec<Arc<dyn DisplayListener>> = {
            let inner = self.inner.lock().unwrap();
            inner.listeners.values().cloned().collect()
        };
        for listener in listeners {
            listener.on_display_event(event);
        }
    }
}

impl DisplayStateSource for MockDisplaySource {
    fn query(&self, id: DisplayId) -> Option<DisplaySnapshot> {
        self.inner.lock().unwrap().displays.get(&id).cloned()
    }

    fn subscribe(&self, listener: Arc<dyn DisplayListener>) -> SubscriptionId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_subscription;
        inner.next_subscription += 1;
        inner.listeners.insert(id, listener);
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.lock().unwrap().listeners.remove(&id.0);
    }
}
