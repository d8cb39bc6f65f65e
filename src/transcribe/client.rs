use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

use crate::config::TranscriptionConfig;

/// Fixed instruction sent with every transcription request.
pub const TRANSCRIPTION_PROMPT: &str = "Transcreva o áudio a seguir em Português.";

const API_KEY_ENV: &str = "GROQ_API_KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("transcription API key not set ({0})")]
    MissingApiKey(&'static str),
    #[error("failed to read staged audio: {0}")]
    Io(#[from] std::io::Error),
    #[error("transcription request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("transcription API returned status {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    /// Absent field decodes as the empty string.
    #[serde(default)]
    text: String,
}

/// Client for an OpenAI-compatible `/audio/transcriptions` endpoint.
///
/// One multipart POST per clip: the staged file plus fixed `model`, `prompt`,
/// `temperature` and `response_format` fields, authenticated with a bearer
/// token. No retries; a slow call simply blocks the interaction until the
/// request times out or returns.
pub struct TranscriptionClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl TranscriptionClient {
    /// Build a client with no API key attached (tests inject one explicitly).
    pub fn new(config: &TranscriptionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: None,
            client,
        }
    }

    /// Build a client with the key from `GROQ_API_KEY`, if present. A missing
    /// key is not an error here; the first transcription call will report it.
    pub fn from_env(config: &TranscriptionConfig) -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Self {
            api_key,
            ..Self::new(config)
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Transcribe a staged audio file. Returns the `text` field of the JSON
    /// response, which defaults to the empty string when absent.
    pub async fn transcribe_file(
        &self,
        path: &Path,
        filename: &str,
    ) -> Result<String, TranscribeError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(TranscribeError::MissingApiKey(API_KEY_ENV))?;

        let bytes = tokio::fs::read(path).await?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("audio/wav")?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("prompt", TRANSCRIPTION_PROMPT)
            .text("temperature", "0")
            .text("response_format", "json");

        let url = format!("{}/audio/transcriptions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("Transcription API error ({}): {}", status, body);
            return Err(TranscribeError::Api { status, body });
        }

        let parsed: TranscriptionResponse = response.json().await?;

        info!("Transcription returned {} characters", parsed.text.len());

        Ok(parsed.text)
    }
}
