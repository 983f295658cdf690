// src/channel.rs

//! HardwareModeChannel - the remote call surface that asks the display
//! hardware to engage or release the high-brightness mode.
//!
//! Both operations are fire-and-forget from the coordinator's perspective:
//! the return value only reports whether the request could be delivered, not
//! whether the mode engaged. Confirmation arrives independently through the
//! display-event stream, so delivery failures are logged and swallowed at the
//! call site rather than propagated.

use crate::display::DisplayId;

/// Error delivering a request to the hardware mode channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The remote endpoint is gone or was never connected.
    Unavailable,
    /// The transport reported a delivery failure.
    Transport(String),
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::Unavailable => write!(f, "hardware mode channel unavailable"),
            ChannelError::Transport(msg) => write!(f, "hardware mode channel transport: {}", msg),
        }
    }
}

impl std::error::Error for ChannelError {}

/// One-way request surface toward the display hardware.
pub trait HardwareModeChannel: Send + Sync {
    /// Ask the hardware to engage the mode for `display` (freezes the
    /// refresh rate at its peak).
    fn request_on(&self, display: DisplayId) -> Result<(), ChannelError>;

    /// Ask the hardware to release the mode for `display`.
    fn request_off(&self, display: DisplayId) -> Result<(), ChannelError>;
}
