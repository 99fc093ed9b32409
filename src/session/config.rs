use serde::{Deserialize, Serialize};

use crate::audio::CaptureConfig;

/// Configuration for a recording session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "recording-2026-08-07-platform-3")
    pub session_id: String,

    /// Sample rate for audio capture (the recognizer expects 16kHz)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("recording-{}", uuid::Uuid::new_v4()),
            sample_rate: 16000, // the recognizer expects 16kHz
            channels: 1,        // Mono
        }
    }
}

impl SessionConfig {
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}
