use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use super::{report_prompt, ReportError, ReportGenerator};
use crate::config::ReportConfig;

const API_KEY_ENV: &str = "GROQ_API_KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Report backend for OpenAI-compatible `/chat/completions` endpoints.
///
/// Sends a single user-role message and returns
/// `choices[0].message.content`.
pub struct ChatCompletionsGenerator {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ChatCompletionsGenerator {
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
impl ReportGenerator for ChatCompletionsGenerator {
    fn name(&self) -> &'static str {
        "chat_completions"
    }

    fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, transcript: &str) -> Result<String, ReportError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ReportError::MissingApiKey(API_KEY_ENV))?;

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: report_prompt(transcript),
            }],
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("Chat completions API error ({}): {}", status, body);
            return Err(ReportError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;

        let report = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ReportError::EmptyResponse)?;

        info!("Report generated: {} characters", report.len());

        Ok(report)
    }
}
