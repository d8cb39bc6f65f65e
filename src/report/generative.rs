use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use super::{report_prompt, ReportError, ReportGenerator};
use crate::config::ReportConfig;

const API_KEY_ENV: &str = "GEMINI_API_KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

/// Report backend for Google-style `models/{model}:generateContent` endpoints.
///
/// Returns `candidates[0].content.parts[0].text`. The key travels in the
/// `x-goog-api-key` header, not in the URL.
pub struct GenerativeContentGenerator {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GenerativeContentGenerator {
    pub fn new(config: &ReportConfig) -> Self {
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

    pub fn from_env(config: &ReportConfig) -> Self {
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
}

#[async_trait::async_trait]
impl ReportGenerator for GenerativeContentGenerator {
    fn name(&self) -> &'static str {
        "generative_content"
    }

    fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, transcript: &str) -> Result<String, ReportError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ReportError::MissingApiKey(API_KEY_ENV))?;

        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: report_prompt(transcript),
                }],
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("Generate content API error ({}): {}", status, body);
            return Err(ReportError::Api { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;

        let report = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(ReportError::EmptyResponse)?;

        info!("Report generated: {} characters", report.len());

        Ok(report)
    }
}
