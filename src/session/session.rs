use super::config::SessionConfig;
use super::state::{SessionError, SessionSnapshot, SessionState};
use crate::audio::{AudioHandle, AudioMode, AudioPlatform, PermissionStatus};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

/// A recording session that manages one audio capture from permission
/// request through finalized artifact, plus playback of the result.
///
/// Exactly one capture is active at a time. The artifact handle is owned
/// by the platform; the session only holds a reference to pass on to the
/// transcription submitter.
pub struct RecordingSession {
    config: SessionConfig,
    platform: Arc<dyn AudioPlatform>,
    state: SessionState,
    audio_handle: Option<AudioHandle>,
    error: Option<String>,
    started_at: Option<DateTime<Utc>>,
    playing: bool,
}

impl RecordingSession {
    pub fn new(config: SessionConfig, platform: Arc<dyn AudioPlatform>) -> Self {
        Self {
            config,
            platform,
            state: SessionState::Idle,
            audio_handle: None,
            error: None,
            started_at: None,
            playing: false,
        }
    }

    /// Start capturing audio.
    ///
    /// Requests the microphone, switches the device into capture mode and
    /// opens a fresh stream. Any previous outcome (handle or error) is
    /// cleared first. Refused with `CaptureInProgress` while a capture is
    /// already running.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Recording {
            warn!(
                "Start requested while session {} is recording",
                self.config.session_id
            );
            return Err(SessionError::CaptureInProgress);
        }

        info!("Starting recording session: {}", self.config.session_id);

        self.clear().await;
        self.state = SessionState::RequestingPermission;

        match self.platform.request_permission().await {
            Ok(PermissionStatus::Granted) => {}
            Ok(PermissionStatus::Denied) => {
                return Err(self.fail(SessionError::PermissionDenied));
            }
            Err(e) => {
                return Err(self.fail(SessionError::DeviceUnavailable(e)));
            }
        }

        if let Err(e) = self.platform.set_mode(AudioMode::Record).await {
            return Err(self.fail(SessionError::DeviceUnavailable(e)));
        }

        if let Err(e) = self.platform.open_stream(&self.config.capture_config()).await {
            // A failed open leaves nothing held; put the device back.
            if let Err(restore) = self.platform.set_mode(AudioMode::Playback).await {
                warn!("Failed to restore audio mode: {:#}", restore);
            }
            return Err(self.fail(SessionError::DeviceUnavailable(e)));
        }

        self.started_at = Some(Utc::now());
        self.state = SessionState::Recording;
        info!("Recording started: {}", self.config.session_id);

        Ok(())
    }

    /// Stop capturing and finalize the artifact.
    ///
    /// The capture stream is released whether or not finalization
    /// succeeds, and the device mode is restored either way.
    pub async fn stop(&mut self) -> Result<AudioHandle, SessionError> {
        if self.state != SessionState::Recording {
            return Err(self.fail(SessionError::NoActiveRecording));
        }

        info!("Stopping recording session: {}", self.config.session_id);
        self.state = SessionState::Stopping;

        let finalized = self.platform.close_stream().await;

        if let Err(e) = self.platform.set_mode(AudioMode::Playback).await {
            warn!("Failed to restore audio mode: {:#}", e);
        }

        match finalized {
            Ok(handle) => {
                self.audio_handle = Some(handle.clone());
                self.state = SessionState::Completed;
                info!(
                    "Recording completed: {} -> {}",
                    self.config.session_id, handle
                );
                Ok(handle)
            }
            Err(e) => Err(self.fail(SessionError::FinalizeError(e))),
        }
    }

    /// Return to `Idle`, releasing playback and clearing the handle.
    /// Idempotent.
    pub async fn reset(&mut self) {
        self.clear().await;
        self.state = SessionState::Idle;
        info!("Recording session reset: {}", self.config.session_id);
    }

    /// Play back the completed artifact.
    ///
    /// Playback failures record an error message but leave the capture
    /// state untouched; a failed replay must not invalidate a good
    /// artifact.
    pub async fn play(&mut self) -> Result<(), SessionError> {
        let Some(handle) = self.audio_handle.clone() else {
            let err = SessionError::NothingToPlay;
            self.error = Some(err.to_string());
            return Err(err);
        };

        // Restart from the top if a playback is already running.
        if self.playing {
            if let Err(e) = self.platform.stop_playback().await {
                warn!("Failed to stop previous playback: {:#}", e);
            }
            self.playing = false;
        }

        match self.platform.start_playback(&handle).await {
            Ok(()) => {
                self.playing = true;
                Ok(())
            }
            Err(e) => {
                let err = SessionError::PlaybackFailed(e);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Stop playing the completed artifact. No-op when idle.
    pub async fn stop_playing(&mut self) -> Result<(), SessionError> {
        if !self.playing {
            return Ok(());
        }
        self.playing = false;

        if let Err(e) = self.platform.stop_playback().await {
            let err = SessionError::PlaybackFailed(e);
            self.error = Some(err.to_string());
            return Err(err);
        }
        Ok(())
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handle of the completed artifact; `Some` exactly when the state is
    /// `Completed`.
    pub fn audio_handle(&self) -> Option<&AudioHandle> {
        self.audio_handle.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current session state for external consumers
    pub fn snapshot(&self) -> SessionSnapshot {
        let duration_secs = self
            .started_at
            .map(|t| Utc::now().signed_duration_since(t).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);

        SessionSnapshot {
            session_id: self.config.session_id.clone(),
            state: self.state,
            audio_handle: self.audio_handle.as_ref().map(|h| h.to_string()),
            error: self.error.clone(),
            started_at: self.started_at,
            duration_secs,
        }
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        error!("Recording session {} failed: {}", self.config.session_id, err);
        self.state = SessionState::Failed;
        self.error = Some(err.to_string());
        err
    }

    async fn clear(&mut self) {
        if self.playing {
            if let Err(e) = self.platform.stop_playback().await {
                warn!("Failed to stop playback: {:#}", e);
            }
            self.playing = false;
        }
        self.audio_handle = None;
        self.error = None;
        self.started_at = None;
    }
}
