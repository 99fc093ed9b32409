use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::RecognizerConfig;

/// Every hypothesis is submitted at 16kHz, matching the capture target.
pub const SAMPLE_RATE_HERTZ: u32 = 16_000;

/// Audio encoding hypothesis submitted to the recognizer.
///
/// The capture pipeline does not guarantee a single container/codec
/// across platforms, so submissions guess from a short fixed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AudioEncoding {
    #[serde(rename = "LINEAR16")]
    Linear16,
    #[serde(rename = "FLAC")]
    Flac,
    #[serde(rename = "MP3")]
    Mp3,
}

impl AudioEncoding {
    /// Hypotheses in submission order.
    pub const HYPOTHESES: [AudioEncoding; 3] = [
        AudioEncoding::Linear16,
        AudioEncoding::Flac,
        AudioEncoding::Mp3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::Flac => "FLAC",
            AudioEncoding::Mp3 => "MP3",
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for the `speech:recognize` call
#[derive(Debug, Clone, Serialize)]
pub struct RecognizeRequest {
    pub config: RecognitionConfig,
    pub audio: RecognitionAudio,
}

impl RecognizeRequest {
    pub fn new(recognizer: &RecognizerConfig, encoding: AudioEncoding, content: String) -> Self {
        Self {
            config: RecognitionConfig {
                encoding,
                sample_rate_hertz: SAMPLE_RATE_HERTZ,
                language_code: recognizer.language_code.clone(),
                enable_automatic_punctuation: true,
                model: recognizer.model.clone(),
            },
            audio: RecognitionAudio { content },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    pub encoding: AudioEncoding,
    pub sample_rate_hertz: u32,
    pub language_code: String,
    pub enable_automatic_punctuation: bool,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecognitionAudio {
    /// Base64-encoded audio payload
    pub content: String,
}

/// Response body of the `speech:recognize` call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognizeResponse {
    #[serde(default)]
    pub results: Vec<RecognitionResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognitionAlternative {
    pub transcript: Option<String>,
    pub confidence: Option<f32>,
}

impl RecognizeResponse {
    /// Transcript of the first alternative of the first result, trimmed.
    /// `None` when the response carries no usable text.
    pub fn first_transcript(&self) -> Option<&str> {
        let text = self
            .results
            .first()?
            .alternatives
            .first()?
            .transcript
            .as_deref()?
            .trim();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
