use std::sync::Arc;
use tracing::{error, info, warn};

use super::notice::{Notice, PipelineStage};
use super::run::{RunState, RunStore};
use crate::audio::AudioClip;
use crate::report::ReportGenerator;
use crate::staging::StagedAudio;
use crate::transcribe::TranscriptionClient;

/// The capture → staging → transcription → report sequence.
///
/// Strictly sequential, one pass per clip, no retries. Every stage failure
/// degrades to an empty output plus a notice on the run record; nothing here
/// aborts the process. An empty transcript ends the run without ever calling
/// the report backend.
pub struct Pipeline {
    transcriber: TranscriptionClient,
    generator: Arc<dyn ReportGenerator>,
}

impl Pipeline {
    pub fn new(transcriber: TranscriptionClient, generator: Arc<dyn ReportGenerator>) -> Self {
        Self {
            transcriber,
            generator,
        }
    }

    pub fn transcription_ready(&self) -> bool {
        self.transcriber.has_api_key()
    }

    pub fn report_ready(&self) -> bool {
        self.generator.has_api_key()
    }

    pub fn report_backend(&self) -> &'static str {
        self.generator.name()
    }

    /// Run the pipeline for an already-inserted run record, writing state
    /// transitions to the store as they happen so status polls see progress.
    pub async fn execute(&self, clip: AudioClip, store: &RunStore, run_id: &str) {
        info!(
            "Run {}: {} bytes of audio from {:?}",
            run_id,
            clip.bytes.len(),
            clip.origin
        );

        store.set_state(run_id, RunState::Transcribing).await;
        let transcript = self.transcribe_stage(&clip, store, run_id).await;
        store.set_transcript(run_id, &transcript).await;

        if transcript.is_empty() {
            store.mark_finished(run_id, RunState::TranscribedEmpty).await;
            info!("Run {}: empty transcript, report stage skipped", run_id);
            return;
        }

        store.set_state(run_id, RunState::Transcribed).await;

        let report = self.report_stage(&transcript, store, run_id).await;
        store.set_report(run_id, &report).await;

        let final_state = if report.is_empty() {
            RunState::ReportedEmpty
        } else {
            RunState::Reported
        };
        store.mark_finished(run_id, final_state).await;

        info!("Run {}: finished as {:?}", run_id, final_state);
    }

    /// Stage the clip, transcribe it, clean the staged file up. Any failure
    /// becomes a notice and an empty transcript.
    async fn transcribe_stage(&self, clip: &AudioClip, store: &RunStore, run_id: &str) -> String {
        let staged = match StagedAudio::create(&clip.bytes) {
            Ok(staged) => staged,
            Err(e) => {
                error!("Run {}: staging failed: {}", run_id, e);
                store
                    .add_notice(
                        run_id,
                        Notice::error(
                            PipelineStage::Staging,
                            format!("Failed to stage audio for transcription: {}", e),
                        ),
                    )
                    .await;
                return String::new();
            }
        };

        let result = self
            .transcriber
            .transcribe_file(staged.path(), &clip.filename)
            .await;

        // Cleanup runs whether transcription worked or not. A failed delete
        // leaks the file; that is accepted, not retried.
        if let Err(e) = staged.cleanup() {
            warn!("Run {}: staged file left on disk: {}", run_id, e);
            store
                .add_notice(
                    run_id,
                    Notice::warning(
                        PipelineStage::Cleanup,
                        format!("Could not remove the temporary audio file: {}", e),
                    ),
                )
                .await;
        }

        match result {
            Ok(text) => text,
            Err(e) => {
                error!("Run {}: transcription failed: {}", run_id, e);
                store
                    .add_notice(
                        run_id,
                        Notice::error(
                            PipelineStage::Transcription,
                            format!("Transcription failed: {}", e),
                        ),
                    )
                    .await;
                String::new()
            }
        }
    }

    async fn report_stage(&self, transcript: &str, store: &RunStore, run_id: &str) -> String {
        store.set_state(run_id, RunState::Reporting).await;

        match self.generator.generate(transcript).await {
            Ok(report) => report,
            Err(e) => {
                error!(
                    "Run {}: report generation failed ({}): {}",
                    run_id,
                    self.generator.name(),
                    e
                );
                store
                    .add_notice(
                        run_id,
                        Notice::error(
                            PipelineStage::Report,
                            format!("Report generation failed: {}", e),
                        ),
                    )
                    .await;
                String::new()
            }
        }
    }
}
