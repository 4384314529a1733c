//! Event handling for the audio bridge
//!
//! Applications observe the bridge through a single registered
//! [`AudioEventHandler`]. Device-change notifications are pushed through
//! [`on_devices_updated`](AudioEventHandler::on_devices_updated); swallowed
//! command failures are surfaced through
//! [`on_command_failed`](AudioEventHandler::on_command_failed) so calling
//! code and tests can assert on them instead of scraping logs.
//!
//! # Usage Example
//!
//! ```rust
//! use audiobridge_core::events::{AudioEventHandler, CommandFailure};
//! use audiobridge_core::device::AudioDeviceInfo;
//! use async_trait::async_trait;
//!
//! struct MyHandler;
//!
//! #[async_trait]
//! impl AudioEventHandler for MyHandler {
//!     async fn on_devices_updated(&self, devices: Vec<AudioDeviceInfo>) {
//!         println!("available routes: {devices:?}");
//!     }
//!
//!     async fn on_command_failed(&self, failure: CommandFailure) {
//!         eprintln!("audio command failed: {}", failure.detail);
//!     }
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::device::AudioDeviceInfo;

/// Fire-and-forget command issued by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// Audio mode change
    SetMode,
    /// Active output device selection
    SelectDevice,
    /// Device re-enumeration request
    RefreshDevices,
}

/// Record of a backend command that failed after being issued.
///
/// Failures are terminal: the bridge never retries a command. The record
/// carries enough detail for telemetry and test assertions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandFailure {
    /// Which command failed
    pub command: CommandKind,
    /// Human-readable failure description
    pub detail: String,
    /// When the failure was observed
    pub timestamp: DateTime<Utc>,
}

impl CommandFailure {
    /// Create a failure record stamped with the current time.
    pub fn new(command: CommandKind, detail: impl Into<String>) -> Self {
        Self {
            command,
            detail: detail.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Observer of bridge events.
///
/// A bridge holds at most one handler at a time. Handler methods receive
/// owned data and return nothing; the bridge does not wait for an
/// acknowledgment beyond the method's own completion.
#[async_trait]
pub trait AudioEventHandler: Send + Sync {
    /// Handle a device-change notification.
    ///
    /// Called with the full, ordered list of currently available routes
    /// every time the backend reports a change. The list replaces any
    /// previously delivered one; consecutive identical lists are delivered
    /// without de-duplication.
    async fn on_devices_updated(&self, devices: Vec<AudioDeviceInfo>);

    /// Handle a swallowed command failure (optional).
    ///
    /// Called when a fire-and-forget command issued through the bridge is
    /// rejected by the backend. The default implementation does nothing.
    async fn on_command_failed(&self, failure: CommandFailure) {
        let _ = failure;
    }
}
