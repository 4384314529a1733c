//! Mock backend implementations
//!
//! Scriptable fakes used by the test suites and the bundled demos. The
//! mocks record every command they receive and can be told to reject
//! commands or withhold capabilities, so failure paths are exercisable
//! without platform bindings.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::backend::AudioBackend;
use crate::backend::router::DeviceHandler;
use crate::device::{AudioDeviceInfo, DeviceType};
use crate::error::{BridgeError, BridgeResult};
use crate::mode::AudioMode;

/// Command recorded by a [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuedCommand {
    /// `set_mode` was issued
    SetMode(AudioMode),
    /// `select_device` was issued with this identifier
    SelectDevice(String),
    /// `refresh_devices` was issued
    RefreshDevices,
}

/// Scriptable [`AudioBackend`] for tests and demos.
pub struct MockBackend {
    events_tx: broadcast::Sender<Vec<AudioDeviceInfo>>,
    commands: Mutex<Vec<IssuedCommand>>,
    reject_set_mode: AtomicBool,
    reject_select_device: AtomicBool,
    refresh_supported: AtomicBool,
}

impl MockBackend {
    /// Create a mock backend. Refresh is supported by default.
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(crate::DEFAULT_EVENT_CAPACITY);
        Self {
            events_tx,
            commands: Mutex::new(Vec::new()),
            reject_set_mode: AtomicBool::new(false),
            reject_select_device: AtomicBool::new(false),
            refresh_supported: AtomicBool::new(true),
        }
    }

    /// Emit a device-change notification to all subscribers.
    pub fn push_devices(&self, devices: Vec<AudioDeviceInfo>) {
        let _ = self.events_tx.send(devices);
    }

    /// Commands issued so far, in order.
    pub fn issued_commands(&self) -> Vec<IssuedCommand> {
        self.commands.lock().clone()
    }

    /// Make subsequent `set_mode` calls fail.
    pub fn reject_set_mode(&self, reject: bool) {
        self.reject_set_mode.store(reject, Ordering::SeqCst);
    }

    /// Make subsequent `select_device` calls fail.
    pub fn reject_select_device(&self, reject: bool) {
        self.reject_select_device.store(reject, Ordering::SeqCst);
    }

    /// Advertise or withhold the device-refresh capability.
    pub fn set_refresh_supported(&self, supported: bool) {
        self.refresh_supported.store(supported, Ordering::SeqCst);
    }
}

#[async_trait]
impl AudioBackend for MockBackend {
    fn subscribe_devices(&self) -> broadcast::Receiver<Vec<AudioDeviceInfo>> {
        self.events_tx.subscribe()
    }

    async fn set_mode(&self, mode: AudioMode) -> BridgeResult<()> {
        self.commands.lock().push(IssuedCommand::SetMode(mode));
        if self.reject_set_mode.load(Ordering::SeqCst) {
            return Err(BridgeError::mode_rejected(mode, "mock backend rejection"));
        }
        Ok(())
    }

    async fn select_device(&self, identifier: &str) -> BridgeResult<()> {
        self.commands
            .lock()
            .push(IssuedCommand::SelectDevice(identifier.to_string()));
        if self.reject_select_device.load(Ordering::SeqCst) {
            return Err(BridgeError::device_rejected(
                identifier,
                "mock backend rejection",
            ));
        }
        Ok(())
    }

    fn supports_device_refresh(&self) -> bool {
        self.refresh_supported.load(Ordering::SeqCst)
    }

    async fn refresh_devices(&self) -> BridgeResult<()> {
        self.commands.lock().push(IssuedCommand::RefreshDevices);
        if !self.refresh_supported.load(Ordering::SeqCst) {
            return Err(BridgeError::capability_unsupported("device refresh"));
        }
        Ok(())
    }
}

/// Platform operation recorded by a [`MockDeviceHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOp {
    /// A mode was applied
    Mode(AudioMode),
    /// A route was applied
    Route(DeviceType),
}

/// Recording [`DeviceHandler`] for router tests.
pub struct MockDeviceHandler {
    applied: Mutex<Vec<HandlerOp>>,
    fail_set_mode: AtomicBool,
}

impl MockDeviceHandler {
    /// Create a handler that accepts every operation.
    pub fn new() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            fail_set_mode: AtomicBool::new(false),
        }
    }

    /// Make subsequent mode applications fail, simulating a denied audio
    /// focus request.
    pub fn fail_set_mode(&self, fail: bool) {
        self.fail_set_mode.store(fail, Ordering::SeqCst);
    }

    /// Operations applied so far, in order.
    pub fn applied(&self) -> Vec<HandlerOp> {
        self.applied.lock().clone()
    }
}

#[async_trait]
impl DeviceHandler for MockDeviceHandler {
    async fn set_mode(&self, mode: AudioMode) -> BridgeResult<()> {
        if self.fail_set_mode.load(Ordering::SeqCst) {
            return Err(BridgeError::mode_rejected(mode, "audio focus request denied"));
        }
        self.applied.lock().push(HandlerOp::Mode(mode));
        Ok(())
    }

    async fn set_route(&self, device: DeviceType) -> BridgeResult<()> {
        self.applied.lock().push(HandlerOp::Route(device));
        Ok(())
    }
}

/// Descriptor for a freshly paired Bluetooth headset with a synthetic uid.
pub fn paired_bluetooth_headset() -> AudioDeviceInfo {
    AudioDeviceInfo::with_uid(DeviceType::Bluetooth, Uuid::new_v4().to_string())
}
