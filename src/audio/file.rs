use anyhow::{bail, Context, Result};
use hound::WavReader;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::platform::{AudioHandle, AudioMode, AudioPlatform, CaptureConfig, PermissionStatus};

/// File-backed audio platform
///
/// Stands in for a real microphone: each capture stream spools the
/// configured source WAV into a fresh artifact under the recordings
/// directory. Used by the demo binary and for batch processing, the same
/// role a file audio source plays in live capture stacks.
pub struct FileAudioPlatform {
    source: PathBuf,
    recordings_dir: PathBuf,
    state: Mutex<PlatformState>,
}

#[derive(Debug)]
struct PlatformState {
    active: Option<ActiveCapture>,
    mode: AudioMode,
    playing: bool,
}

#[derive(Debug)]
struct ActiveCapture {
    artifact_path: PathBuf,
}

impl FileAudioPlatform {
    pub fn new(source: impl Into<PathBuf>, recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            recordings_dir: recordings_dir.into(),
            state: Mutex::new(PlatformState {
                active: None,
                mode: AudioMode::Playback,
                playing: false,
            }),
        }
    }

    /// Current device mode, visible for assertions and logging.
    pub fn mode(&self) -> AudioMode {
        self.state.lock().unwrap().mode
    }

    fn spool_wav(source: &Path, dest: &Path) -> Result<()> {
        let mut reader = WavReader::open(source)
            .with_context(|| format!("Failed to open source audio: {}", source.display()))?;
        let spec = reader.spec();

        let out_spec = hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(dest, out_spec)
            .with_context(|| format!("Failed to create artifact: {}", dest.display()))?;

        for sample in reader.samples::<i16>() {
            let sample = sample.context("Failed to read source sample")?;
            writer
                .write_sample(sample)
                .context("Failed to write sample to artifact")?;
        }

        writer.finalize().context("Failed to finalize artifact")?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AudioPlatform for FileAudioPlatform {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        // No OS permission gate for file input.
        Ok(PermissionStatus::Granted)
    }

    async fn set_mode(&self, mode: AudioMode) -> Result<()> {
        self.state.lock().unwrap().mode = mode;
        Ok(())
    }

    async fn open_stream(&self, config: &CaptureConfig) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.active.is_some() {
            bail!("a capture stream is already open");
        }

        // Probe the source so a bad input fails at open time, the way a
        // device refuses to start.
        let reader = WavReader::open(&self.source)
            .with_context(|| format!("Failed to open source audio: {}", self.source.display()))?;
        let spec = reader.spec();
        if spec.sample_rate != config.sample_rate || spec.channels != config.channels {
            info!(
                "Source audio is {}Hz/{}ch (requested {}Hz/{}ch); capturing as-is",
                spec.sample_rate, spec.channels, config.sample_rate, config.channels
            );
        }

        std::fs::create_dir_all(&self.recordings_dir)
            .context("Failed to create recordings directory")?;

        let artifact_path = self
            .recordings_dir
            .join(format!("recording-{}.wav", Uuid::new_v4()));

        info!(
            "Capture stream opened: {} -> {}",
            self.source.display(),
            artifact_path.display()
        );

        state.active = Some(ActiveCapture { artifact_path });
        Ok(())
    }

    async fn close_stream(&self) -> Result<AudioHandle> {
        // Take the stream out first; it is released whether or not the
        // flush below succeeds.
        let active = self.state.lock().unwrap().active.take();
        let Some(active) = active else {
            bail!("no capture stream is open");
        };

        Self::spool_wav(&self.source, &active.artifact_path)?;

        info!("Capture stream finalized: {}", active.artifact_path.display());
        Ok(AudioHandle::new(active.artifact_path.display().to_string()))
    }

    async fn read_artifact(&self, handle: &AudioHandle) -> Result<Vec<u8>> {
        tokio::fs::read(handle.as_str())
            .await
            .with_context(|| format!("Failed to read audio artifact: {}", handle))
    }

    async fn start_playback(&self, handle: &AudioHandle) -> Result<()> {
        if !Path::new(handle.as_str()).exists() {
            bail!("audio artifact not found: {}", handle);
        }
        self.state.lock().unwrap().playing = true;
        // No output device on the file platform; the artifact is only
        // marked as playing.
        info!("Playback requested for {}", handle);
        Ok(())
    }

    async fn stop_playback(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.playing {
            state.playing = false;
            info!("Playback stopped");
        } else {
            warn!("No playback in progress");
        }
        Ok(())
    }
}
