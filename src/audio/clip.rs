use serde::{Deserialize, Serialize};

/// Download filename for recorded audio, kept from the original UI.
pub const RECORDED_AUDIO_FILENAME: &str = "gravacao.wav";

/// Where a clip's bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipOrigin {
    /// File sent through the multipart upload endpoint.
    Upload,
    /// Encoded WAV posted by the browser recorder widget.
    Recorder,
    /// Live capture session finalized on the server.
    Capture,
}

/// A single buffer of encoded audio, produced by exactly one acquisition path
/// and consumed once by the staging step. No decoding or duration validation
/// happens here; whatever the client sent is what the transcription API gets.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub origin: ClipOrigin,
    /// Filename hint used for the multipart part; not a filesystem path.
    pub filename: String,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, origin: ClipOrigin, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            origin,
            filename: filename.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
