//! Device event bridge
//!
//! [`AudioBridge`] connects a platform [`AudioBackend`] to a single
//! application-level [`AudioEventHandler`]. It forwards device-change
//! notifications, keeps the last known device list queryable, and exposes
//! fire-and-forget command methods for mode and device selection.
//!
//! The bridge favors availability over observability: no public method
//! returns an error or panics. Every backend failure degrades to "the
//! requested change did not happen", visible through `tracing` logs and
//! [`AudioEventHandler::on_command_failed`].
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use audiobridge_core::backend::MockBackend;
//! use audiobridge_core::bridge::AudioBridge;
//! use audiobridge_core::device::AudioDeviceInfo;
//! use audiobridge_core::events::AudioEventHandler;
//!
//! struct PrintHandler;
//!
//! #[async_trait]
//! impl AudioEventHandler for PrintHandler {
//!     async fn on_devices_updated(&self, devices: Vec<AudioDeviceInfo>) {
//!         println!("routes changed: {devices:?}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = Arc::new(MockBackend::new());
//!     let bridge = AudioBridge::with_handler(backend, Arc::new(PrintHandler));
//!
//!     // Entering a video call.
//!     bridge.set_mode(true, true, false);
//!
//!     // The user tapped the speaker button.
//!     bridge.select_device("SPEAKER");
//!
//!     // Call ended.
//!     bridge.set_mode(false, false, false);
//!     bridge.close();
//! }
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::AudioBackend;
use crate::device::AudioDeviceInfo;
use crate::events::{AudioEventHandler, CommandFailure, CommandKind};
use crate::mode::AudioMode;

/// State shared between the bridge and its forwarding task.
struct BridgeInner {
    /// Last device list received from the backend
    devices: RwLock<Vec<AudioDeviceInfo>>,
    /// The single registered observer, if any
    handler: RwLock<Option<Arc<dyn AudioEventHandler>>>,
    /// Mode last requested through this bridge
    last_mode: Mutex<Option<AudioMode>>,
}

impl BridgeInner {
    async fn report_failure(&self, command: CommandKind, detail: String) {
        let handler = self.handler.read().clone();
        if let Some(handler) = handler {
            handler
                .on_command_failed(CommandFailure::new(command, detail))
                .await;
        }
    }
}

/// Bridge between a platform audio backend and one application observer.
///
/// Constructing a bridge subscribes to the backend's device events exactly
/// once and spawns the forwarding task; [`close`](AudioBridge::close) (or
/// dropping the bridge) tears the subscription down. Bridges hold an
/// explicit backend handle, so several independent bridges over distinct
/// backends are safe, including in tests.
///
/// Must be created within a Tokio runtime.
pub struct AudioBridge {
    backend: Arc<dyn AudioBackend>,
    inner: Arc<BridgeInner>,
    forward_task: Mutex<Option<JoinHandle<()>>>,
}

impl AudioBridge {
    /// Create a bridge with no observer registered yet.
    ///
    /// Device updates received before an observer is registered still
    /// replace the stored list; only the notification is dropped.
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self::build(backend, None)
    }

    /// Create a bridge and register its observer in one step.
    pub fn with_handler(backend: Arc<dyn AudioBackend>, handler: Arc<dyn AudioEventHandler>) -> Self {
        Self::build(backend, Some(handler))
    }

    fn build(backend: Arc<dyn AudioBackend>, handler: Option<Arc<dyn AudioEventHandler>>) -> Self {
        let inner = Arc::new(BridgeInner {
            devices: RwLock::new(Vec::new()),
            handler: RwLock::new(handler),
            last_mode: Mutex::new(None),
        });

        let events_rx = backend.subscribe_devices();
        let forward_task = tokio::spawn(Self::forward_events(events_rx, Arc::clone(&inner)));

        Self {
            backend,
            inner,
            forward_task: Mutex::new(Some(forward_task)),
        }
    }

    /// Register or replace the single observer.
    pub fn set_event_handler(&self, handler: Arc<dyn AudioEventHandler>) {
        *self.inner.handler.write() = Some(handler);
    }

    /// Snapshot of the last device list received from the backend.
    pub fn devices(&self) -> Vec<AudioDeviceInfo> {
        self.inner.devices.read().clone()
    }

    /// Mode last requested through this bridge, if any.
    pub fn mode(&self) -> Option<AudioMode> {
        *self.inner.last_mode.lock()
    }

    /// Update the audio mode from the current call state.
    ///
    /// Computes the [`AudioMode`] from the flags and issues the backend
    /// command without waiting for completion. Failures are logged and
    /// reported to the observer; they are never returned or retried.
    pub fn set_mode(&self, in_call: bool, is_video: bool, is_silent: bool) {
        let mode = AudioMode::from_call_flags(in_call, is_video, is_silent);
        *self.inner.last_mode.lock() = Some(mode);

        let backend = Arc::clone(&self.backend);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if let Err(error) = backend.set_mode(mode).await {
                warn!(%mode, %error, "failed to set audio mode");
                inner
                    .report_failure(CommandKind::SetMode, error.to_string())
                    .await;
            }
        });
    }

    /// Request a device re-enumeration from the backend.
    ///
    /// Silent no-op when the backend lacks the capability. Results arrive
    /// through the device-change channel, not through a return value.
    pub fn refresh_devices(&self) {
        if !self.backend.supports_device_refresh() {
            debug!("backend does not support device refresh; ignoring");
            return;
        }

        let backend = Arc::clone(&self.backend);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if let Err(error) = backend.refresh_devices().await {
                warn!(%error, "failed to refresh audio devices");
                inner
                    .report_failure(CommandKind::RefreshDevices, error.to_string())
                    .await;
            }
        });
    }

    /// Switch active output to the device matching `identifier`.
    ///
    /// Rejections (unknown identifier, backend refusal) are logged and
    /// reported to the observer; the stored device list is not altered by
    /// a failed selection.
    pub fn select_device(&self, identifier: impl Into<String>) {
        let identifier = identifier.into();
        let backend = Arc::clone(&self.backend);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if let Err(error) = backend.select_device(&identifier).await {
                warn!(device = %identifier, %error, "failed to set audio device");
                inner
                    .report_failure(CommandKind::SelectDevice, error.to_string())
                    .await;
            }
        });
    }

    /// Stop forwarding device events and drop the backend subscription.
    ///
    /// Idempotent. After closing, no further updates reach the observer or
    /// the stored list. Commands already issued cannot be withdrawn.
    pub fn close(&self) {
        if let Some(task) = self.forward_task.lock().take() {
            task.abort();
            debug!("audio bridge closed; device event forwarding stopped");
        }
    }

    async fn forward_events(
        mut events_rx: broadcast::Receiver<Vec<AudioDeviceInfo>>,
        inner: Arc<BridgeInner>,
    ) {
        loop {
            match events_rx.recv().await {
                Ok(devices) => {
                    *inner.devices.write() = devices.clone();

                    let handler = inner.handler.read().clone();
                    match handler {
                        Some(handler) => handler.on_devices_updated(devices).await,
                        None => debug!("no event handler registered; device update dropped"),
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Last write wins; skip straight to the newest list.
                    warn!(skipped, "device event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

impl Drop for AudioBridge {
    fn drop(&mut self) {
        self.close();
    }
}
