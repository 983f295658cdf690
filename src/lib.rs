// src/lib.rs

//! Display high-brightness-mode (HBM) request coordinator.
//!
//! Under-display biometric sensing needs the panel driven in a special
//! hardware mode, which in turn requires the display to be powered on and
//! locked to its peak refresh rate. This crate owns the request/acknowledge
//! protocol around that mode: it asks the hardware to engage the mode,
//! watches the display-event stream for confirmation that the required state
//! was actually reached, fires a completion callback exactly once, and tears
//! the mode down again on disable.
//!
//! ## Threading Model
//! - The state machine ([`coordinator::HbmCoordinator`]) is single-threaded
//!   and owned by a dedicated control thread.
//! - All entry points are messages; display events are forwarded into the
//!   same queue, so commands and events serialize through one receiver.
//! - Hardware calls are fire-and-forget; confirmation only ever arrives via
//!   the display-event stream.

pub mod channel;
pub mod config;
pub mod coordinator;
pub mod display;
