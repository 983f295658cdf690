// src/coordinator/mod.rs

//! HbmCoordinator - the request/acknowledge state machine for the display
//! high-brightness mode.
//!
//! One request may be in flight at a time. `enable` issues the hardware call
//! and subscribes to display events; the mode counts as active only once the
//! display is observed powered on at its peak refresh rate. That observation
//! may arrive through the event stream or through the synchronous re-check
//! inside `enable` itself (the subscription is installed before the re-check,
//! so no state change can slip between the two). Completion is idempotent:
//! however many qualifying events are delivered, the callback fires once.
//!
//! ## Threading Model
//! All methods taking `&mut self` must run on a single control context. The
//! struct holds no synchronization; exclusive access is the caller's
//! obligation, made structural by [`actor::CoordinatorActor`] which confines
//! the coordinator to one thread.

pub mod actor;


use crate::channel::HardwareModeChannel;
use crate::display::{
    DisplayEvent, DisplayId, DisplayListener, DisplayStateSource, SubscriptionId,
};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::sync::Arc;

/// Callback invoked when an enable or disable cycle completes.
pub type CompletionCallback = Box<dyn FnOnce() + Send>;

/// One enable/disable cycle. At most one exists at a time.
struct Request {
    /// Owned exclusively until fired or discarded; consumed on invocation.
    on_activated: Option<CompletionCallback>,

    /// Set true exactly once, when the activation predicate was observed and
    /// the callback invoked. Never reverses.
    satisfied: bool,
}

/// Coordinates the high-brightness mode for a single display.
pub struct HbmCoordinator {
    display_id: DisplayId,
    peak_refresh_rate: f32,
    source: Arc<dyn DisplayStateSource>,
    channel: Option<Arc<dyn HardwareModeChannel>>,
    listener: Arc<dyn DisplayListener>,
    current_request: Option<Request>,
    subscription: Option<SubscriptionId>,
}

impl HbmCoordinator {
    /// Create a coordinator scoped to `display_id`.
    ///
    /// The peak refresh rate is computed once here, from the display's
    /// supported modes. `channel` being `None` means the hardware feature is
    /// unavailable; `enable` will reject until a coordinator is built with a
    /// live channel.
    pub fn new(
        display_id: DisplayId,
        source: Arc<dyn DisplayStateSource>,
        channel: Option<Arc<dyn HardwareModeChannel>>,
        listener: Arc<dyn DisplayListener>,
    ) -> Result<Self> {
        let snapshot = source
            .query(display_id)
            .with_context(|| format!("display {} not known to state source", display_id))?;
        let peak_refresh_rate = snapshot.peak_refresh_rate();

        info!(
            "HbmCoordinator: created for display {}, peak refresh rate {} Hz",
            display_id, peak_refresh_rate
        );

        Ok(Self {
            display_id,
            peak_refresh_rate,
            source,
            channel,
            listener,
            current_request: None,
            subscription: None,
        })
    }

    /// Target display of this coordinator.
    pub fn display_id(&self) -> DisplayId {
        self.display_id
    }

    /// Peak refresh rate used in the activation predicate.
    pub fn peak_refresh_rate(&self) -> f32 {
        self.peak_refresh_rate
    }

    /// Whether a request is currently in flight.
    pub fn is_pending(&self) -> bool {
        self.current_request.is_some()
    }

    /// Begin one activation cycle.
    ///
    /// Rejected (logged, no-op) if the hardware channel is unavailable or a
    /// request is already pending. `on_activated` fires once the display is
    /// observed powered on at peak refresh rate - possibly synchronously
    /// within this call, if the display is already there.
    pub fn enable(&mut self, on_activated: Option<CompletionCallback>) {
        if self.channel.is_none() {
            error!("HbmCoordinator: enable: hardware mode channel is unavailable");
            return;
        }

        if self.current_request.is_some() {
            error!("HbmCoordinator: enable: mode is already requested");
            return;
        }

        self.current_request = Some(Request {
            on_activated,
            satisfied: false,
        });

        // Subscribe before the state re-check below, so a change landing in
        // between cannot be missed.
        self.subscription = Some(self.source.subscribe(self.listener.clone()));

        if let Some(channel) = &self.channel {
            match channel.request_on(self.display_id) {
                Ok(()) => info!("HbmCoordinator: channel.request_on delivered"),
                // Delivery failure does not roll the request back; the
                // display-event stream remains the source of truth.
                Err(e) => error!("HbmCoordinator: enable: request_on failed: {}", e),
            }
        }

        match self.source.query(self.display_id) {
            Some(snapshot) => {
                if snapshot.power.is_on() && snapshot.refresh_rate == self.peak_refresh_rate {
                    // Already in the target state; don't wait for an event
                    // that may never come.
                    self.complete_request();
                }
            }
            None => warn!(
                "HbmCoordinator: enable: display {} missing from state source",
                self.display_id
            ),
        }
    }

    /// Handle a display event delivered by the state source.
    pub fn on_display_event(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::Changed(id) => self.on_display_changed(id),
            DisplayEvent::Added(id) => debug!("HbmCoordinator: display added, id {}", id),
            DisplayEvent::Removed(id) => debug!("HbmCoordinator: display removed, id {}", id),
        }
    }

    fn on_display_changed(&mut self, id: DisplayId) {
        let Some(request) = self.current_request.as_ref() else {
            warn!("HbmCoordinator: on_display_changed: no request pending");
            return;
        };

        if id != self.display_id {
            warn!("HbmCoordinator: on_display_changed: unknown display {}", id);
            return;
        }

        let Some(snapshot) = self.source.query(id) else {
            warn!(
                "HbmCoordinator: on_display_changed: display {} missing from state source",
                id
            );
            return;
        };

        if !snapshot.power.is_on() {
            warn!(
                "HbmCoordinator: on_display_changed: power state is {:?}, not on",
                snapshot.power
            );
            if request.satisfied {
                // Anomaly after confirmed activation; the delivered callback
                // cannot be un-fired, so this is diagnostics only.
                error!("HbmCoordinator: power state changed while mode is active");
            }
            return;
        }

        if snapshot.refresh_rate != self.peak_refresh_rate {
            warn!(
                "HbmCoordinator: on_display_changed: refresh rate {} is not peak {}",
                snapshot.refresh_rate, self.peak_refresh_rate
            );
            if request.satisfied {
                error!("HbmCoordinator: refresh rate changed while mode is active");
            }
            return;
        }

        self.complete_request();
    }

    /// End the current cycle.
    ///
    /// Always clears the request slot and unsubscribes first, so no further
    /// display events can race with teardown. If the request was never
    /// satisfied there is nothing active on the hardware side: no off-request
    /// is sent and `on_deactivated` is not invoked.
    pub fn disable(&mut self, on_deactivated: Option<CompletionCallback>) {
        let Some(request) = self.current_request.take() else {
            warn!("HbmCoordinator: disable: mode is already disabled");
            return;
        };

        if let Some(subscription) = self.subscription.take() {
            self.source.unsubscribe(subscription);
        }

        if !request.satisfied {
            debug!("HbmCoordinator: disable: request was never confirmed active");
            return;
        }

        if let Some(channel) = &self.channel {
            match channel.request_off(self.display_id) {
                Ok(()) => info!("HbmCoordinator: channel.request_off delivered"),
                // Best-effort; nothing to retry against.
                Err(e) => error!("HbmCoordinator: disable: request_off failed: {}", e),
            }
        }

        if let Some(callback) = on_deactivated {
            callback();
        }
    }

    /// Idempotent completion path: marks the current request satisfied and
    /// fires its callback, once.
    fn complete_request(&mut self) {
        let Some(request) = self.current_request.as_mut() else {
            return;
        };

        if request.satisfied {
            return;
        }
        request.satisfied = true;

        info!(
            "HbmCoordinator: mode active on display {} at {} Hz",
            self.display_id, self.peak_refresh_rate
        );

        if let Some(callback) = request.on_activated.take() {
            callback();
        }
    }
}
