use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Lifecycle of one audio capture.
///
/// `Completed` and `Failed` are terminal until `reset()` or the next
/// `start()`, which resets implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    RequestingPermission,
    Recording,
    Stopping,
    Completed,
    Failed,
}

/// Session-layer failures
///
/// Every variant is terminal for the current operation; the session drops
/// to `Failed` and the user retries from the UI.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("microphone permission is needed to record audio")]
    PermissionDenied,

    #[error("audio capture device is unavailable: {0}")]
    DeviceUnavailable(#[source] anyhow::Error),

    #[error("no active recording to stop")]
    NoActiveRecording,

    #[error("failed to finalize the recording: {0}")]
    FinalizeError(#[source] anyhow::Error),

    /// A start request arrived while a capture was running; the running
    /// capture is left untouched.
    #[error("a recording is already in progress")]
    CaptureInProgress,

    #[error("no completed recording to play")]
    NothingToPlay,

    #[error("audio playback failed: {0}")]
    PlaybackFailed(#[source] anyhow::Error),
}

/// Snapshot of a session for external consumers
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Session identifier
    pub session_id: String,

    /// Current lifecycle state
    pub state: SessionState,

    /// URI of the completed artifact, if any
    pub audio_handle: Option<String>,

    /// Last error message, if any
    pub error: Option<String>,

    /// When the capture started
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds since the capture started
    pub duration_secs: f64,
}
