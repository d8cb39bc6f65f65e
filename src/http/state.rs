use crate::capture::CaptureSession;
use crate::config::Config;
use crate::pipeline::{Pipeline, RunStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded service configuration
    pub config: Arc<Config>,

    /// Staging → transcription → report pipeline
    pub pipeline: Arc<Pipeline>,

    /// Pipeline runs (run_id → record), kept for status and artifact downloads
    pub runs: RunStore,

    /// Active capture sessions (capture_id → session)
    pub captures: Arc<RwLock<HashMap<String, Arc<CaptureSession>>>>,
}

impl AppState {
    pub fn new(config: Config, pipeline: Pipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            runs: RunStore::new(),
            captures: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
