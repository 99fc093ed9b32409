use base64::Engine;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audio::{AudioHandle, AudioPlatform};
use crate::config::RecognizerConfig;

use super::mock::{self, MockPicker, UniformPicker};
use super::request::{AudioEncoding, RecognizeRequest};
use super::transport::{RecognizeTransport, TransportError};

/// Terminal submission failures.
///
/// Invalid credentials never appear here: a bad key, discovered locally
/// or remotely, downgrades to the canned-transcript path instead of
/// failing the submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("speech API key is missing; set GOOGLE_API_KEY or recognizer.api_key")]
    MissingCredentials,

    #[error("failed to read the recorded audio")]
    AudioRead(#[source] anyhow::Error),

    #[error("no transcription found; try recording longer audio with clear speech")]
    NoTranscriptFound,
}

/// Where a transcript came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptSource {
    /// Live result from the recognition service.
    Remote { encoding: AudioEncoding },
    /// Canned fallback used when credentials are unusable.
    Canned,
}

/// Final outcome of one submission; immutable once produced.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    pub source: TranscriptSource,
}

/// Outcome of a single encoding hypothesis.
#[derive(Debug)]
enum AttemptOutcome {
    NoTranscript,
    TransportFailure(String),
}

/// One record per hypothesis per submission; never persisted.
#[derive(Debug)]
struct Attempt {
    encoding: AudioEncoding,
    outcome: AttemptOutcome,
}

/// Submits a completed recording for transcription.
///
/// Iterates the fixed encoding hypotheses in order until one yields
/// usable text; hypotheses run strictly sequentially. At most one
/// submission should be in flight per completed session; the caller
/// enforces that.
pub struct TranscriptionSubmitter {
    config: RecognizerConfig,
    platform: Arc<dyn AudioPlatform>,
    transport: Box<dyn RecognizeTransport>,
    picker: Box<dyn MockPicker>,
}

impl TranscriptionSubmitter {
    pub fn new(
        config: RecognizerConfig,
        platform: Arc<dyn AudioPlatform>,
        transport: Box<dyn RecognizeTransport>,
    ) -> Self {
        Self {
            config,
            platform,
            transport,
            picker: Box::new(UniformPicker),
        }
    }

    /// Replace the canned-transcript picker (tests pin the pick).
    pub fn with_picker(mut self, picker: Box<dyn MockPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Transcribe the artifact behind `handle`.
    ///
    /// Runs to completion once started; there is no mid-flight abort.
    pub async fn submit(&self, handle: &AudioHandle) -> Result<Transcript, SubmitError> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(SubmitError::MissingCredentials),
        };

        if !key_shape_is_valid(api_key) {
            info!("API key shape is not usable; falling back to a canned transcript");
            return Ok(self.canned().await);
        }

        let bytes = match self.platform.read_artifact(handle).await {
            Ok(bytes) => bytes,
            Err(e) => return Err(SubmitError::AudioRead(e)),
        };
        let content = base64::engine::general_purpose::STANDARD.encode(&bytes);
        debug!("Audio artifact read: {} bytes", bytes.len());

        let mut attempts = Vec::new();

        for encoding in AudioEncoding::HYPOTHESES {
            debug!("Trying {} encoding", encoding);
            let request = RecognizeRequest::new(&self.config, encoding, content.clone());

            match self.transport.recognize(api_key, &request).await {
                Ok(response) => match response.first_transcript() {
                    Some(text) => {
                        info!("Transcription succeeded with {}", encoding);
                        return Ok(Transcript {
                            text: text.to_string(),
                            source: TranscriptSource::Remote { encoding },
                        });
                    }
                    None => {
                        info!("No transcript in {} response", encoding);
                        attempts.push(Attempt {
                            encoding,
                            outcome: AttemptOutcome::NoTranscript,
                        });
                    }
                },
                Err(TransportError::InvalidCredentials) => {
                    // A rejection at call time is treated exactly like a
                    // bad key shape.
                    info!("API key rejected by the service; falling back to a canned transcript");
                    return Ok(self.canned().await);
                }
                Err(err) => {
                    let message = err.to_string();
                    warn!("{} attempt failed: {}", encoding, message);
                    attempts.push(Attempt {
                        encoding,
                        outcome: AttemptOutcome::TransportFailure(message),
                    });
                }
            }
        }

        warn!("All encoding hypotheses exhausted: {:?}", attempts);
        Err(SubmitError::NoTranscriptFound)
    }

    async fn canned(&self) -> Transcript {
        // Keep the pacing of a real round trip.
        tokio::time::sleep(self.config.mock_latency()).await;
        Transcript {
            text: mock::canned_transcript(self.picker.as_ref()).to_string(),
            source: TranscriptSource::Canned,
        }
    }
}

/// Light format check, not a correctness check: hosted API keys carry a
/// fixed prefix.
pub fn key_shape_is_valid(key: &str) -> bool {
    key.starts_with("AIza")
}
