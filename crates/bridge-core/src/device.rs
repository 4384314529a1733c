//! Audio device model
//!
//! This module defines the device types recognized by the routing layer and
//! the device descriptor carried by device-change notifications.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Category of an audio route.
///
/// These mirror the device classes exposed by mobile audio subsystems. The
/// string form (`"BLUETOOTH"`, `"EARPIECE"`, `"HEADPHONES"`, `"SPEAKER"`) is
/// the stable identifier used on the wire and accepted by
/// [`select_device`](crate::bridge::AudioBridge::select_device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    /// Bluetooth SCO headset or car kit
    Bluetooth,
    /// Built-in earpiece
    Earpiece,
    /// Wired or USB headphones/headset
    Headphones,
    /// Built-in loudspeaker
    Speaker,
}

impl DeviceType {
    /// Stable string identifier for this device type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Bluetooth => "BLUETOOTH",
            DeviceType::Earpiece => "EARPIECE",
            DeviceType::Headphones => "HEADPHONES",
            DeviceType::Speaker => "SPEAKER",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BLUETOOTH" => Ok(DeviceType::Bluetooth),
            "EARPIECE" => Ok(DeviceType::Earpiece),
            "HEADPHONES" => Ok(DeviceType::Headphones),
            "SPEAKER" => Ok(DeviceType::Speaker),
            other => Err(BridgeError::device_rejected(other, "unknown device type")),
        }
    }
}

/// Descriptor of a single audio route in a device-change notification.
///
/// Values are immutable: each notification replaces the previous list
/// wholesale, entries are never mutated in place. The `uid` distinguishes
/// peripherals when several devices share a type (e.g. two paired Bluetooth
/// headsets); built-in routes carry no uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDeviceInfo {
    /// Route category
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    /// Stable peripheral identifier, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Whether this route is the one currently in use
    #[serde(default)]
    pub selected: bool,
}

impl AudioDeviceInfo {
    /// Create a descriptor for a built-in route.
    pub fn new(device_type: DeviceType) -> Self {
        Self {
            device_type,
            uid: None,
            selected: false,
        }
    }

    /// Create a descriptor carrying a peripheral uid.
    pub fn with_uid(device_type: DeviceType, uid: impl Into<String>) -> Self {
        Self {
            device_type,
            uid: Some(uid.into()),
            selected: false,
        }
    }
}
