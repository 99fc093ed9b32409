use anyhow::Result;
use std::fmt;

/// Microphone permission outcome reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Device interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMode {
    /// Capture-compatible mode: microphone routing enabled, playback
    /// allowed to mix with an open stream.
    Record,
    /// Default playback-only mode, restored once capture ends.
    Playback,
}

/// Opaque reference to a completed recording artifact.
///
/// Resolvable to bytes only through [`AudioPlatform::read_artifact`]; the
/// underlying storage belongs to the platform, not to this handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioHandle(String);

impl AudioHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for a capture stream
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
        }
    }
}

/// Host audio capability
///
/// Everything the recording pipeline needs from the platform: permission
/// grant/deny, device mode switching, stream open/finalize, artifact
/// resolution, and playback of a completed artifact. Implementations hold
/// at most one open capture stream and must release it on `close_stream`
/// whether or not finalization succeeds.
#[async_trait::async_trait]
pub trait AudioPlatform: Send + Sync {
    /// Ask the host for microphone access.
    async fn request_permission(&self) -> Result<PermissionStatus>;

    /// Switch the device interaction mode.
    async fn set_mode(&self, mode: AudioMode) -> Result<()>;

    /// Open a new capture stream and start recording into it.
    async fn open_stream(&self, config: &CaptureConfig) -> Result<()>;

    /// Flush and close the active capture stream, yielding the artifact.
    async fn close_stream(&self) -> Result<AudioHandle>;

    /// Resolve a completed artifact to its raw bytes.
    async fn read_artifact(&self, handle: &AudioHandle) -> Result<Vec<u8>>;

    /// Begin playback of a completed artifact.
    async fn start_playback(&self, handle: &AudioHandle) -> Result<()>;

    /// Stop any active playback and release the player.
    async fn stop_playback(&self) -> Result<()>;
}
