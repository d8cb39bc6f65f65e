use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// PCM format for live captures. Fixed to what the browser side streams:
/// mono 16-bit at 48 kHz.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 1,
        }
    }
}

/// Hosted speech-to-text endpoint settings. The API key is *not* part of the
/// config file; it comes from the `GROQ_API_KEY` environment variable.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// Base URL of the OpenAI-compatible API (no trailing slash needed).
    pub base_url: String,
    pub model: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "whisper-large-v3".to_string(),
        }
    }
}

/// Which hosted LLM turns a transcript into a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportBackendKind {
    /// OpenAI-compatible `/chat/completions` endpoint (Groq et al.).
    ChatCompletions,
    /// Google-style `models/{model}:generateContent` endpoint.
    GenerativeContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub backend: ReportBackendKind,
    pub base_url: String,
    pub model: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            backend: ReportBackendKind::ChatCompletions,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-8b-8192".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
