//! HTTP API for audio intake, capture control and artifact downloads
//!
//! This module provides the REST surface the recorder widgets talk to:
//! - POST /audio/upload - Transcribe an uploaded audio file
//! - POST /audio/clip - Transcribe a raw recorder clip
//! - POST /captures/start - Start a live capture session
//! - POST /captures/:id/frames - Push PCM frames into a capture
//! - GET /captures/:id/status - Query capture status
//! - POST /captures/:id/stop - Stop a capture and run the pipeline
//! - GET /runs/:id - Query a pipeline run
//! - GET /runs/:id/transcript|report|audio - Download run artifacts
//! - GET /health - Health check with credential flags

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
