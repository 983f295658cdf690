// src/coordinator/actor.rs

//! Control thread for the coordinator.
//!
//! [`HbmCoordinator`] is single-threaded by contract. Rather than asserting
//! that contract at runtime, this module makes it structural: the coordinator
//! is moved onto a dedicated thread that drains one bounded channel, and all
//! callers (including the display source's event delivery) reach it only
//! through messages. Commands and display events serialize through the same
//! receiver, so teardown ordering is exact: once a `Disable` is processed,
//! any display events still queued behind it find no pending request and are
//! ignored.

use crate::channel::HardwareModeChannel;
use crate::config::CONFIG;
use crate::coordinator::{CompletionCallback, HbmCoordinator};
use crate::display::{DisplayEvent, DisplayId, DisplayListener, DisplayStateSource};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::sync::mpsc::{self, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Messages drained by the control thread.
enum ControlMsg {
    Enable {
        on_activated: Option<CompletionCallback>,
    },
    Disable {
        on_deactivated: Option<CompletionCallback>,
    },
    Display(DisplayEvent),
    Shutdown,
}

/// Listener registered with the display source; forwards events into the
/// control queue so they interleave with commands in delivery order.
struct EventForwarder {
    tx: SyncSender<ControlMsg>,
}

impl DisplayListener for EventForwarder {
    fn on_display_event(&self, event: DisplayEvent) {
        // Blocking send: backpressure on the event producer beats dropping a
        // confirmation the protocol is waiting for.
        if self.tx.send(ControlMsg::Display(event)).is_err() {
            warn!("CoordinatorActor: dropping display event, control thread is gone");
        }
    }
}

/// Sender side of the coordinator. Cheap to clone.
#[derive(Clone)]
pub struct CoordinatorHandle {
    tx: SyncSender<ControlMsg>,
}

impl CoordinatorHandle {
    /// Request mode activation. `on_activated` fires on the control thread
    /// once the display is confirmed powered on at peak refresh rate.
    pub fn enable(&self, on_activated: Option<CompletionCallback>) -> Result<()> {
        self.tx
            .send(ControlMsg::Enable { on_activated })
            .map_err(|_| anyhow::anyhow!("Failed to send Enable to coordinator"))
    }

    /// Request mode teardown. `on_deactivated` fires on the control thread if
    /// the mode had been confirmed active.
    pub fn disable(&self, on_deactivated: Option<CompletionCallback>) -> Result<()> {
        self.tx
            .send(ControlMsg::Disable { on_deactivated })
            .map_err(|_| anyhow::anyhow!("Failed to send Disable to coordinator"))
    }

    /// Ask the control thread to exit.
    pub fn shutdown(&self) -> Result<()> {
        self.tx
            .send(ControlMsg::Shutdown)
            .map_err(|_| anyhow::anyhow!("Failed to send Shutdown to coordinator"))
    }
}

/// Owns the control thread; joins it on drop.
pub struct CoordinatorActor {
    thread_handle: Option<JoinHandle<()>>,
    handle: CoordinatorHandle,
}

impl CoordinatorActor {
    /// Build the coordinator for `display_id` and spawn its control thread.
    ///
    /// Fails if the display is unknown to the source or the thread cannot be
    /// spawned. The returned handle is the only way to reach the coordinator.
    pub fn spawn(
        display_id: DisplayId,
        source: Arc<dyn DisplayStateSource>,
        channel: Option<Arc<dyn HardwareModeChannel>>,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::sync_channel(CONFIG.coordinator.control_queue_depth);

        let listener = Arc::new(EventForwarder { tx: tx.clone() });
        let mut coordinator = HbmCoordinator::new(display_id, source, channel, listener)
            .context("Failed to create HBM coordinator")?;

        let thread_handle = thread::Builder::new()
            .name("hbm-coordinator".to_string())
            .spawn(move || {
                debug!("CoordinatorActor: control thread started");
                loop {
                    match rx.recv() {
                        Ok(ControlMsg::Enable { on_activated }) => {
                            coordinator.enable(on_activated);
                        }
                        Ok(ControlMsg::Disable { on_deactivated }) => {
                            coordinator.disable(on_deactivated);
                        }
                        Ok(ControlMsg::Display(event)) => {
                            coordinator.on_display_event(event);
                        }
                        Ok(ControlMsg::Shutdown) => {
                            info!("CoordinatorActor: shutdown requested, exiting");
                            return;
                        }
                        Err(_) => {
                            info!("CoordinatorActor: control channel closed, exiting");
                            return;
                        }
                    }
                }
            })
            .context("Failed to spawn coordinator control thread")?;

        Ok(Self {
            thread_handle: Some(thread_handle),
            handle: CoordinatorHandle { tx },
        })
    }

    /// Handle for sending commands to the control thread.
    pub fn handle(&self) -> CoordinatorHandle {
        self.handle.clone()
    }
}

impl Drop for CoordinatorActor {
    fn drop(&mut self) {
        let _ = self.handle.shutdown();
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                error!("CoordinatorActor: control thread panicked: {:?}", e);
            }
        }
    }
}
