// src/display/mod.rs

//! Display-domain types and the trait seams consumed by the coordinator.
//!
//! The coordinator never talks to real display hardware. It consumes a
//! [`DisplayStateSource`] - something that can report the current state of a
//! display and deliver change notifications to registered listeners. Event
//! delivery is at-least-once and may repeat identical states; the coordinator
//! is responsible for idempotency.

pub mod mock;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a logical display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayId(pub u32);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Power state of a display panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// Panel is off.
    Off,
    /// Panel is fully on.
    On,
    /// Panel is in a low-power always-on state.
    Dozing,
}

impl PowerState {
    pub fn is_on(&self) -> bool {
        matches!(self, PowerState::On)
    }
}

/// Point-in-time state of a display, as reported by a [`DisplayStateSource`].
#[derive(Debug, Clone)]
pub struct DisplaySnapshot {
    /// Current panel power state.
    pub power: PowerState,
    /// Currently active refresh rate in Hz.
    pub refresh_rate: f32,
    /// Refresh rates of all supported display modes, in Hz.
    pub supported_refresh_rates: Vec<f32>,
}

impl DisplaySnapshot {
    /// Peak refresh rate over all supported modes, 0.0 if none are reported.
    pub fn peak_refresh_rate(&self) -> f32 {
        self.supported_refresh_rates
            .iter()
            .copied()
            .fold(0.0, f32::max)
    }
}

/// Change notifications delivered to subscribed listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// A display's state changed (power, refresh rate, ...). Carries only the
    /// id; listeners re-query the source for the current state.
    Changed(DisplayId),

    /// A display appeared.
    Added(DisplayId),

    /// A display went away.
    Removed(DisplayId),
}

/// Handle identifying one listener registration, for later unsubscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Receiver of display change notifications.
///
/// Implementations must be cheap and non-blocking aside from queueing; they
/// are invoked from whatever context the source delivers events on.
pub trait DisplayListener: Send + Sync {
    fn on_display_event(&self, event: DisplayEvent);
}

/// Source of display state and change notifications.
///
/// Queries are synchronous data reads; subscriptions deliver [`DisplayEvent`]s
/// until unsubscribed. Events for displays the listener does not care about
/// may be delivered and must be filtered by the listener.
pub trait DisplayStateSource: Send + Sync {
    /// Current state of `id`, or `None` if the source does not know it.
    fn query(&self, id: DisplayId) -> Option<DisplaySnapshot>;

    /// Register a listener for change notifications.
    fn subscribe(&self, listener: Arc<dyn DisplayListener>) -> SubscriptionId;

    /// Remove a previously registered listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}
