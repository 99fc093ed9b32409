use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://speech.googleapis.com/v1/speech:recognize";
const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub recognizer: RecognizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "transit-scribe".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub recordings_path: String,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            recordings_path: "recordings".to_string(),
            sample_rate: 16000, // the recognizer expects 16kHz
            channels: 1,        // Mono
        }
    }
}

/// Settings for the transcription submitter, injected by value so callers
/// and tests never depend on ambient process state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Speech API key; filled from `GOOGLE_API_KEY` when absent
    pub api_key: Option<String>,
    /// Recognition endpoint
    pub endpoint: String,
    /// BCP-47 language tag sent with every request
    pub language_code: String,
    /// Recognition model hint ("latest_long" suits announcements)
    pub model: String,
    /// Simulated latency of the canned-transcript path, in milliseconds
    pub mock_latency_ms: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language_code: "en-US".to_string(),
            model: "latest_long".to_string(),
            mock_latency_ms: 2000,
        }
    }
}

impl RecognizerConfig {
    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        let mut cfg: Config = settings.try_deserialize()?;
        cfg.fill_api_key_from_env();
        Ok(cfg)
    }

    /// Load from `path` when given, defaults otherwise. The API key falls
    /// back to the environment either way.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let mut cfg = Config::default();
                cfg.fill_api_key_from_env();
                Ok(cfg)
            }
        }
    }

    fn fill_api_key_from_env(&mut self) {
        if self.recognizer.api_key.is_none() {
            self.recognizer.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }
    }
}
