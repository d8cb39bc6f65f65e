pub mod audio;
pub mod capture;
pub mod config;
pub mod http;
pub mod pipeline;
pub mod report;
pub mod staging;
pub mod transcribe;

pub use audio::{AudioClip, ClipOrigin, PcmFrame, WavInfo, RECORDED_AUDIO_FILENAME};
pub use capture::{CaptureConfig, CaptureSession, CaptureStats};
pub use config::Config;
pub use http::{create_router, AppState};
pub use pipeline::{
    Notice, Pipeline, PipelineStage, RunRecord, RunState, RunStore, Severity, REPORT_FILENAME,
    TRANSCRIPT_FILENAME,
};
pub use report::{
    ChatCompletionsGenerator, GenerativeContentGenerator, ReportError, ReportGenerator,
};
pub use staging::StagedAudio;
pub use transcribe::{TranscribeError, TranscriptionClient};
