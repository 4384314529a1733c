//! Audio mode model
//!
//! The audio mode is the platform's routing profile. It is derived from the
//! call state rather than chosen directly by applications.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Platform audio routing profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioMode {
    /// Used before and after every call. Represents the platform's default
    /// audio routing scheme.
    Default,
    /// Used for audio-only calls. Routes to the earpiece by default, unless
    /// a wired or Bluetooth headset is connected.
    AudioCall,
    /// Used for video calls. Routes to the speaker by default, unless a
    /// wired or Bluetooth headset is connected.
    VideoCall,
    /// Used for calls that must not play audio out loud.
    Silent,
}

impl AudioMode {
    /// Derive the audio mode from the current call state.
    ///
    /// Precedence is fixed: outside a call the mode is always
    /// [`AudioMode::Default`] regardless of the other flags; within a call
    /// `is_silent` dominates, then `is_video` decides between
    /// [`AudioMode::VideoCall`] and [`AudioMode::AudioCall`].
    pub fn from_call_flags(in_call: bool, is_video: bool, is_silent: bool) -> Self {
        if !in_call {
            AudioMode::Default
        } else if is_silent {
            AudioMode::Silent
        } else if is_video {
            AudioMode::VideoCall
        } else {
            AudioMode::AudioCall
        }
    }

    /// Whether this mode belongs to an active call.
    pub fn is_in_call(&self) -> bool {
        !matches!(self, AudioMode::Default)
    }

    /// Stable string identifier for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioMode::Default => "DEFAULT",
            AudioMode::AudioCall => "AUDIO_CALL",
            AudioMode::VideoCall => "VIDEO_CALL",
            AudioMode::Silent => "SILENT",
        }
    }
}

impl fmt::Display for AudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_derivation_covers_every_flag_combination() {
        let cases = [
            // (in_call, is_video, is_silent) -> expected
            (false, false, false, AudioMode::Default),
            (false, false, true, AudioMode::Default),
            (false, true, false, AudioMode::Default),
            (false, true, true, AudioMode::Default),
            (true, false, false, AudioMode::AudioCall),
            (true, true, false, AudioMode::VideoCall),
            (true, false, true, AudioMode::Silent),
            (true, true, true, AudioMode::Silent),
        ];

        for (in_call, is_video, is_silent, expected) in cases {
            assert_eq!(
                AudioMode::from_call_flags(in_call, is_video, is_silent),
                expected,
                "flags ({in_call}, {is_video}, {is_silent})"
            );
        }
    }

    #[test]
    fn only_default_is_out_of_call() {
        assert!(!AudioMode::Default.is_in_call());
        assert!(AudioMode::AudioCall.is_in_call());
        assert!(AudioMode::VideoCall.is_in_call());
        assert!(AudioMode::Silent.is_in_call());
    }
}
