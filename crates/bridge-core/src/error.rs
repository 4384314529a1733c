//! Error types for the audio bridge

use thiserror::Error;

use crate::mode::AudioMode;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors produced by audio backends.
///
/// Note that [`AudioBridge`](crate::bridge::AudioBridge) never returns these
/// to its callers: command failures are logged and reported through
/// [`AudioEventHandler::on_command_failed`](crate::events::AudioEventHandler::on_command_failed).
/// The typed variants exist so backends, tests, and telemetry can branch on
/// the failure class.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// The backend does not implement the requested capability
    #[error("capability not supported: {capability}")]
    CapabilityUnsupported {
        /// Name of the missing capability
        capability: String,
    },

    /// The backend refused to enter the requested audio mode
    #[error("failed to set audio mode {mode}: {reason}")]
    ModeRejected {
        /// Mode that was requested
        mode: AudioMode,
        /// Backend-supplied reason
        reason: String,
    },

    /// The backend refused to route to the requested device
    #[error("failed to set audio device {device}: {reason}")]
    DeviceRejected {
        /// Identifier that was requested
        device: String,
        /// Backend-supplied reason
        reason: String,
    },

    /// Platform-level failure with no finer classification
    #[error("audio backend error: {message}")]
    Backend {
        /// Description of the failure
        message: String,
    },
}

impl BridgeError {
    /// Create a capability-unsupported error
    pub fn capability_unsupported(capability: impl Into<String>) -> Self {
        Self::CapabilityUnsupported {
            capability: capability.into(),
        }
    }

    /// Create a mode-rejected error
    pub fn mode_rejected(mode: AudioMode, reason: impl Into<String>) -> Self {
        Self::ModeRejected {
            mode,
            reason: reason.into(),
        }
    }

    /// Create a device-rejected error
    pub fn device_rejected(device: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeviceRejected {
            device: device.into(),
            reason: reason.into(),
        }
    }

    /// Create a generic backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
