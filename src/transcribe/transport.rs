use anyhow::anyhow;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::request::{RecognizeRequest, RecognizeResponse};

/// Marker the service includes in its error message when the key is bad.
const INVALID_KEY_MARKER: &str = "API key not valid";

/// Transport-level failures of a single recognition attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The service rejected the credential itself. Callers downgrade this
    /// to the canned-transcript path instead of surfacing it.
    #[error("the speech service rejected the API key")]
    InvalidCredentials,

    #[error("speech request failed")]
    Request(#[source] anyhow::Error),

    #[error("speech service returned status {status}: {message}")]
    Api { status: u16, message: String },
}

/// Outbound recognition call
#[async_trait]
pub trait RecognizeTransport: Send + Sync {
    async fn recognize(
        &self,
        api_key: &str,
        request: &RecognizeRequest,
    ) -> Result<RecognizeResponse, TransportError>;
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// HTTPS transport for the hosted recognizer
///
/// No request timeout is configured; a call that never resolves blocks
/// its submission.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RecognizeTransport for HttpTransport {
    async fn recognize(
        &self,
        api_key: &str,
        request: &RecognizeRequest,
    ) -> Result<RecognizeResponse, TransportError> {
        // The service authenticates API keys through the query string.
        let url = format!("{}?key={}", self.endpoint, api_key);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(anyhow!(e)))?;

        let status = response.status();
        if !status.is_success() {
            let envelope: ApiErrorEnvelope = response.json().await.unwrap_or_default();
            let message = envelope.error.map(|e| e.message).unwrap_or_default();
            debug!("Speech API error ({}): {}", status, message);

            if message.contains(INVALID_KEY_MARKER) {
                return Err(TransportError::InvalidCredentials);
            }
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<RecognizeResponse>()
            .await
            .map_err(|e| TransportError::Request(anyhow!(e)))
    }
}
