//! Reference audio routing backend
//!
//! [`AudioRouter`] implements the routing policy of a mobile VoIP audio
//! subsystem: it tracks the available routes, applies the active call mode,
//! and picks the output device from a fixed preference order with an
//! optional user override. Platform side effects go through an injected
//! [`DeviceHandler`]; everything else is the router's own state machine,
//! which makes the policy testable without any platform bindings.
//!
//! # Routing policy
//!
//! - Outside a call ([`AudioMode::Default`]) no route is held and any user
//!   selection is cleared.
//! - In a call the preference order is Bluetooth, then headphones, then the
//!   loudspeaker. A user-selected device overrides the preference for as
//!   long as it stays available.
//! - Any device change (plug/unplug, Bluetooth connect) resets the current
//!   selection and recomputes the route.
//! - Emitted device snapshots omit the earpiece whenever headphones are
//!   plugged in, and mark exactly the routed device as selected.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, warn};

use crate::backend::AudioBackend;
use crate::device::{AudioDeviceInfo, DeviceType};
use crate::error::BridgeResult;
use crate::mode::AudioMode;

/// Platform operations the router delegates.
///
/// Implementations talk to the actual audio stack (speakerphone toggles,
/// Bluetooth SCO, communication mode, audio focus). The router never calls
/// these concurrently.
#[async_trait]
pub trait DeviceHandler: Send + Sync {
    /// Apply the given audio mode to the platform.
    async fn set_mode(&self, mode: AudioMode) -> BridgeResult<()>;

    /// Set the platform route for the given device.
    async fn set_route(&self, device: DeviceType) -> BridgeResult<()>;
}

/// Audio focus transition reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    /// Focus regained after another application held it
    Gained,
    /// Focus lost indefinitely
    Lost,
    /// Focus lost temporarily
    LostTransient,
}

/// Configuration for an [`AudioRouter`].
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Capacity of the device-change broadcast channel
    pub event_capacity: usize,
    /// Routes available before the first device scan
    pub initial_devices: Vec<DeviceType>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            event_capacity: crate::DEFAULT_EVENT_CAPACITY,
            initial_devices: Vec::new(),
        }
    }
}

impl RouterConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the device-change channel capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Set the routes available before the first device scan.
    pub fn with_initial_devices(mut self, devices: Vec<DeviceType>) -> Self {
        self.initial_devices = devices;
        self
    }
}

/// Routing state guarded by the router's single mutex.
#[derive(Debug, Default)]
struct RouterState {
    /// Available routes, in enumeration order
    available: Vec<DeviceType>,
    /// Device currently routed to, if a call mode is active
    routed: Option<DeviceType>,
    /// User override; cleared on every device change
    user_selected: Option<DeviceType>,
    /// Mode last applied successfully
    mode: Option<AudioMode>,
    /// Whether audio focus is currently lost to another application
    focus_lost: bool,
}

/// Reference [`AudioBackend`] carrying the full routing policy.
///
/// Platform integrations drive the router from their device-detection
/// callbacks via [`replace_devices`](AudioRouter::replace_devices) /
/// [`add_device`](AudioRouter::add_device) /
/// [`remove_device`](AudioRouter::remove_device) and
/// [`focus_changed`](AudioRouter::focus_changed); applications talk to it
/// through the [`AudioBackend`] surface, usually behind an
/// [`AudioBridge`](crate::bridge::AudioBridge).
pub struct AudioRouter {
    handler: Arc<dyn DeviceHandler>,
    events_tx: broadcast::Sender<Vec<AudioDeviceInfo>>,
    state: Mutex<RouterState>,
}

impl AudioRouter {
    /// Create a router with default configuration.
    pub fn new(handler: Arc<dyn DeviceHandler>) -> Self {
        Self::with_config(handler, RouterConfig::default())
    }

    /// Create a router with the given configuration.
    pub fn with_config(handler: Arc<dyn DeviceHandler>, config: RouterConfig) -> Self {
        let (events_tx, _) = broadcast::channel(config.event_capacity.max(1));
        let mut state = RouterState::default();
        for device in config.initial_devices {
            if !state.available.contains(&device) {
                state.available.push(device);
            }
        }
        Self {
            handler,
            events_tx,
            state: Mutex::new(state),
        }
    }

    /// Replace the available-device list wholesale.
    ///
    /// Resets the current selection, recomputes the route when a call mode
    /// is active, and emits a fresh snapshot.
    pub async fn replace_devices(&self, devices: Vec<DeviceType>) {
        let mut state = self.state.lock().await;
        state.available.clear();
        for device in devices {
            if !state.available.contains(&device) {
                state.available.push(device);
            }
        }
        self.reroute_after_churn(&mut state).await;
    }

    /// Add a newly detected device.
    pub async fn add_device(&self, device: DeviceType) {
        let mut state = self.state.lock().await;
        if !state.available.contains(&device) {
            state.available.push(device);
        }
        self.reroute_after_churn(&mut state).await;
    }

    /// Remove a disconnected device.
    pub async fn remove_device(&self, device: DeviceType) {
        let mut state = self.state.lock().await;
        state.available.retain(|d| *d != device);
        self.reroute_after_churn(&mut state).await;
    }

    /// React to an audio focus transition.
    ///
    /// A regain after a loss re-applies the current route even if it is
    /// unchanged, since the other application may have re-routed audio
    /// while it held focus.
    pub async fn focus_changed(&self, change: FocusChange) {
        let mut state = self.state.lock().await;
        match change {
            FocusChange::Lost | FocusChange::LostTransient => {
                state.focus_lost = true;
            }
            FocusChange::Gained => {
                let lost = std::mem::replace(&mut state.focus_lost, false);
                if lost {
                    if let Some(mode) = state.mode {
                        match self.update_route(&mut state, mode, true).await {
                            Ok(()) => self.emit_snapshot(&state),
                            Err(error) => {
                                warn!(%error, "failed to restore audio route after focus regain")
                            }
                        }
                    }
                }
            }
        }
    }

    /// Mode last applied successfully, if any.
    pub async fn current_mode(&self) -> Option<AudioMode> {
        self.state.lock().await.mode
    }

    /// Apply `mode` and recompute the route.
    ///
    /// The handler's mode change runs first; with [`AudioMode::Default`]
    /// the route and user selection are simply cleared. Otherwise the
    /// target is the user-selected device while available, or the first
    /// match in the preference order Bluetooth > Headphones > Speaker.
    /// The handler's route change is skipped when the target equals the
    /// current route, unless `force` is set.
    async fn update_route(
        &self,
        state: &mut RouterState,
        mode: AudioMode,
        force: bool,
    ) -> BridgeResult<()> {
        self.handler.set_mode(mode).await?;

        if mode == AudioMode::Default {
            state.routed = None;
            state.user_selected = None;
            return Ok(());
        }

        let preferred = if state.available.contains(&DeviceType::Bluetooth) {
            DeviceType::Bluetooth
        } else if state.available.contains(&DeviceType::Headphones) {
            DeviceType::Headphones
        } else {
            DeviceType::Speaker
        };

        let target = state
            .user_selected
            .filter(|device| state.available.contains(device))
            .unwrap_or(preferred);

        if !force && state.routed == Some(target) {
            return Ok(());
        }

        state.routed = Some(target);
        self.handler.set_route(target).await?;
        Ok(())
    }

    async fn reroute_after_churn(&self, state: &mut RouterState) {
        state.routed = None;
        state.user_selected = None;
        if let Some(mode) = state.mode {
            if let Err(error) = self.update_route(state, mode, false).await {
                warn!(%error, "failed to update audio route after device change");
            }
        }
        self.emit_snapshot(state);
    }

    /// Broadcast the current device list.
    ///
    /// The earpiece is omitted while headphones are plugged in; exactly the
    /// routed device carries the selected flag. Having no subscribers is
    /// not an error.
    fn emit_snapshot(&self, state: &RouterState) {
        let has_headphones = state.available.contains(&DeviceType::Headphones);
        let devices: Vec<AudioDeviceInfo> = state
            .available
            .iter()
            .filter(|device| !(has_headphones && **device == DeviceType::Earpiece))
            .map(|device| AudioDeviceInfo {
                device_type: *device,
                uid: None,
                selected: state.routed == Some(*device),
            })
            .collect();

        let _ = self.events_tx.send(devices);
    }
}

#[async_trait]
impl AudioBackend for AudioRouter {
    fn subscribe_devices(&self) -> broadcast::Receiver<Vec<AudioDeviceInfo>> {
        self.events_tx.subscribe()
    }

    async fn set_mode(&self, mode: AudioMode) -> BridgeResult<()> {
        let mut state = self.state.lock().await;
        self.update_route(&mut state, mode, false).await?;
        state.mode = Some(mode);
        self.emit_snapshot(&state);
        Ok(())
    }

    async fn select_device(&self, identifier: &str) -> BridgeResult<()> {
        let device: DeviceType = identifier.parse()?;
        let mut state = self.state.lock().await;

        if !state.available.contains(&device) {
            state.user_selected = None;
            return Err(crate::error::BridgeError::device_rejected(
                identifier,
                "device is not available",
            ));
        }

        let Some(mode) = state.mode else {
            // No call in progress; selection would have no route to apply to.
            debug!(%device, "ignoring device selection outside a call");
            return Ok(());
        };

        state.user_selected = Some(device);
        self.update_route(&mut state, mode, false).await?;
        self.emit_snapshot(&state);
        Ok(())
    }

    fn supports_device_refresh(&self) -> bool {
        true
    }

    async fn refresh_devices(&self) -> BridgeResult<()> {
        let state = self.state.lock().await;
        self.emit_snapshot(&state);
        Ok(())
    }
}
