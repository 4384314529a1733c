//! # Audio Bridge Core
//!
//! Cross-platform bridging layer exposing a mobile platform's native audio
//! subsystem (device enumeration, device-change notifications, audio mode
//! switching) to application code, built for VoIP clients.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐    ┌─────────────────────┐    ┌─────────────────────┐
//! │    Application      │    │     AudioBridge     │    │    AudioBackend     │
//! │                     │    │                     │    │                     │
//! │ AudioEventHandler   │◄───│ device list cache   │◄───│ AudioRouter / mock  │
//! │ on_devices_updated  │    │ event forwarding    │    │ device snapshots    │
//! │ on_command_failed   │    │                     │    │                     │
//! │                     │───▶│ set_mode            │───▶│ routing policy      │
//! │ call state changes  │    │ select_device       │    │ DeviceHandler       │
//! │ UI device picker    │    │ refresh_devices     │    │ (platform ops)      │
//! └─────────────────────┘    └─────────────────────┘    └─────────────────────┘
//! ```
//!
//! The bridge subscribes once to its backend's device-change channel,
//! caches the latest list, and forwards every update to the single
//! registered [`AudioEventHandler`](events::AudioEventHandler). Commands
//! are fire-and-forget: failures are logged and reported through the
//! handler, never raised to the caller.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use audiobridge_core::{
//!     AudioBridge, AudioDeviceInfo, AudioEventHandler, AudioRouter, DeviceType,
//!     MockDeviceHandler,
//! };
//!
//! struct Ui;
//!
//! #[async_trait]
//! impl AudioEventHandler for Ui {
//!     async fn on_devices_updated(&self, devices: Vec<AudioDeviceInfo>) {
//!         println!("device picker now shows: {devices:?}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Arc::new(AudioRouter::new(Arc::new(MockDeviceHandler::new())));
//!     let bridge = AudioBridge::with_handler(router.clone(), Arc::new(Ui));
//!
//!     // Platform integration reports the initial device scan.
//!     router
//!         .replace_devices(vec![DeviceType::Earpiece, DeviceType::Speaker])
//!         .await;
//!
//!     // An audio call starts.
//!     bridge.set_mode(true, false, false);
//! }
//! ```

pub mod backend;
pub mod bridge;
pub mod device;
pub mod error;
pub mod events;
pub mod mode;

// Re-exports for convenience
pub use backend::{
    AudioBackend, AudioRouter, DeviceHandler, FocusChange, MockBackend, MockDeviceHandler,
    RouterConfig,
};
pub use bridge::AudioBridge;
pub use device::{AudioDeviceInfo, DeviceType};
pub use error::{BridgeError, BridgeResult};
pub use events::{AudioEventHandler, CommandFailure, CommandKind};
pub use mode::AudioMode;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default capacity of device-change broadcast channels.
///
/// Device topology changes are rare and every notification carries the full
/// list, so a small buffer is enough; a lagged subscriber just skips to the
/// newest snapshot.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;
