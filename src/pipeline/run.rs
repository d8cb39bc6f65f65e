use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::notice::Notice;
use crate::audio::ClipOrigin;

/// Download filenames for the text artifacts, kept from the original UI.
pub const TRANSCRIPT_FILENAME: &str = "transcricao.txt";
pub const REPORT_FILENAME: &str = "relatorio.txt";

/// Where a run is in the pipeline. Terminal states distinguish "nothing came
/// back" from "everything worked" per stage, so the presentation layer can
/// tell a failed transcription from a failed report without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    AudioAcquired,
    Transcribing,
    Transcribed,
    /// Transcription yielded nothing; the report stage was skipped.
    TranscribedEmpty,
    Reporting,
    Reported,
    /// Report generation yielded nothing.
    ReportedEmpty,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::TranscribedEmpty | RunState::Reported | RunState::ReportedEmpty
        )
    }
}

/// Everything one user interaction produced. Replaces the per-widget globals
/// of the original variants: the record is created when audio arrives, updated
/// as the pipeline advances, and kept in the store for artifact downloads.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run_id: String,
    pub origin: ClipOrigin,
    pub state: RunState,
    pub transcript: String,
    pub report: String,
    pub notices: Vec<Notice>,
    /// Size of the acquired audio, for display.
    pub audio_bytes: usize,
    /// The acquired audio itself, served back as `gravacao.wav`.
    #[serde(skip)]
    pub audio: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    pub fn new(run_id: String, origin: ClipOrigin, audio: Vec<u8>) -> Self {
        Self {
            run_id,
            origin,
            state: RunState::AudioAcquired,
            transcript: String::new(),
            report: String::new(),
            notices: Vec::new(),
            audio_bytes: audio.len(),
            audio,
            created_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Shared map of runs (run_id → record). In-memory only; nothing survives a
/// restart.
#[derive(Clone, Default)]
pub struct RunStore {
    runs: Arc<RwLock<HashMap<String, RunRecord>>>,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: RunRecord) {
        let mut runs = self.runs.write().await;
        runs.insert(record.run_id.clone(), record);
    }

    pub async fn get(&self, run_id: &str) -> Option<RunRecord> {
        let runs = self.runs.read().await;
        runs.get(run_id).cloned()
    }

    pub async fn set_state(&self, run_id: &str, state: RunState) {
        let mut runs = self.runs.write().await;
        if let Some(record) = runs.get_mut(run_id) {
            record.state = state;
        }
    }

    pub async fn set_transcript(&self, run_id: &str, transcript: &str) {
        let mut runs = self.runs.write().await;
        if let Some(record) = runs.get_mut(run_id) {
            record.transcript = transcript.to_string();
        }
    }

    pub async fn set_report(&self, run_id: &str, report: &str) {
        let mut runs = self.runs.write().await;
        if let Some(record) = runs.get_mut(run_id) {
            record.report = report.to_string();
        }
    }

    pub async fn add_notice(&self, run_id: &str, notice: Notice) {
        let mut runs = self.runs.write().await;
        if let Some(record) = runs.get_mut(run_id) {
            record.notices.push(notice);
        }
    }

    pub async fn mark_finished(&self, run_id: &str, state: RunState) {
        let mut runs = self.runs.write().await;
        if let Some(record) = runs.get_mut(run_id) {
            record.state = state;
            record.finished_at = Some(Utc::now());
        }
    }
}
