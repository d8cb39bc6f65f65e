use serde::{Deserialize, Serialize};

/// Pipeline step a notice is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Staging,
    Transcription,
    Cleanup,
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// One user-facing diagnostic produced by a pipeline stage. Stages append
/// notices instead of aborting; the presentation layer decides how each kind
/// is rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub stage: PipelineStage,
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn error(stage: PipelineStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(stage: PipelineStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}
