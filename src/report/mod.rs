//! Report generation from a meeting transcript.
//!
//! One capability, two hosted backends: an OpenAI-compatible chat-completions
//! endpoint and a Google-style generate-content endpoint. The active backend
//! is chosen in the `[report]` config section; both wrap the transcript in the
//! same fixed instruction and return the first generated text.

mod chat;
mod generative;

pub use chat::ChatCompletionsGenerator;
pub use generative::GenerativeContentGenerator;

use std::sync::Arc;

use crate::config::{ReportBackendKind, ReportConfig};

/// Fixed instruction wrapping the transcript in every report request.
pub const REPORT_INSTRUCTION: &str = "Você é um assistente que gera relatórios detalhados \
     com base em transcrições de reuniões. Por favor, crie um relatório a partir do seguinte \
     texto transcrito em Português: ";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report API key not set ({0})")]
    MissingApiKey(&'static str),
    #[error("report request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("report API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("report API response carried no generated text")]
    EmptyResponse,
}

/// A hosted LLM backend that turns a transcript into a report.
#[async_trait::async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Backend name for logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Whether credentials are available. A missing key is reported per call,
    /// never at startup.
    fn has_api_key(&self) -> bool;

    async fn generate(&self, transcript: &str) -> Result<String, ReportError>;
}

/// Select the report backend named by the configuration.
pub fn from_config(config: &ReportConfig) -> Arc<dyn ReportGenerator> {
    match config.backend {
        ReportBackendKind::ChatCompletions => Arc::new(ChatCompletionsGenerator::from_env(config)),
        ReportBackendKind::GenerativeContent => {
            Arc::new(GenerativeContentGenerator::from_env(config))
        }
    }
}

fn report_prompt(transcript: &str) -> String {
    format!("{REPORT_INSTRUCTION}{transcript}")
}
