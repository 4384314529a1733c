//! Audio backend abstraction
//!
//! This module defines the seam between the bridge and the platform audio
//! subsystem. The bridge only ever talks to an [`AudioBackend`]; concrete
//! implementations are injected at construction, which keeps multiple
//! independent bridges safe and lets tests substitute a fake backend.
//!
//! Two implementations ship with the crate:
//!
//! - [`router::AudioRouter`] - full routing semantics over an injected
//!   [`router::DeviceHandler`] for the platform side effects
//! - [`mock::MockBackend`] - scriptable fake for tests and demos

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::device::AudioDeviceInfo;
use crate::error::{BridgeError, BridgeResult};
use crate::mode::AudioMode;

pub mod mock;
pub mod router;

pub use mock::{HandlerOp, IssuedCommand, MockBackend, MockDeviceHandler};
pub use router::{AudioRouter, DeviceHandler, FocusChange, RouterConfig};

/// Platform audio subsystem, as seen by the bridge.
///
/// Backends push device-change notifications through a broadcast channel and
/// accept commands that complete asynchronously. Command failures are typed
/// errors; backends must not panic on rejection.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Subscribe to device-change notifications.
    ///
    /// Every notification carries the full, ordered list of currently
    /// available routes. Slow subscribers may miss intermediate lists; the
    /// channel always converges on the newest one.
    fn subscribe_devices(&self) -> broadcast::Receiver<Vec<AudioDeviceInfo>>;

    /// Switch the platform to the given audio mode.
    async fn set_mode(&self, mode: AudioMode) -> BridgeResult<()>;

    /// Route output to the device matching `identifier`.
    ///
    /// The identifier is the stable string form of a
    /// [`DeviceType`](crate::device::DeviceType). Backends may reject
    /// identifiers that do not match an available device.
    async fn select_device(&self, identifier: &str) -> BridgeResult<()>;

    /// Whether this backend can re-enumerate devices on demand.
    ///
    /// Re-enumeration is an optional capability; callers must tolerate its
    /// absence.
    fn supports_device_refresh(&self) -> bool {
        false
    }

    /// Request a device re-enumeration.
    ///
    /// Results arrive through the device-change channel, not through the
    /// return value.
    async fn refresh_devices(&self) -> BridgeResult<()> {
        Err(BridgeError::capability_unsupported("device refresh"))
    }
}
