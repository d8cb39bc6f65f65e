//! The transcription pipeline and its per-run bookkeeping.
//!
//! One run per user interaction: audio in, staged file, hosted transcription,
//! hosted report. State machine per run:
//! `audio_acquired → transcribing → transcribed(|transcribed_empty) →
//! reporting → reported(|reported_empty)`. Empty or failed intermediate
//! output short-circuits; nothing is retried.

mod notice;
mod pipeline;
mod run;

pub use notice::{Notice, PipelineStage, Severity};
pub use pipeline::Pipeline;
pub use run::{RunRecord, RunState, RunStore, REPORT_FILENAME, TRANSCRIPT_FILENAME};
