use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a capture session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureStats {
    /// Whether frames are currently being accepted.
    pub is_recording: bool,

    /// When the capture started.
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_secs: f64,

    /// Number of PCM frames received so far.
    pub frames_received: usize,

    /// Number of samples received so far.
    pub samples_received: usize,

    /// Cosmetic "mm:ss" counter, refreshed once per second by the ticker
    /// task while recording. Not synchronized with frame arrival.
    pub elapsed_display: String,
}

/// Format whole seconds as the "mm:ss" the elapsed indicator shows.
pub fn format_elapsed(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
