use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body. Matches the hosted transcription API's own
/// 25 MB file limit; anything bigger would be rejected upstream anyway.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Audio intake
        .route("/audio/upload", post(handlers::upload_audio))
        .route("/audio/clip", post(handlers::submit_clip))
        // Live capture control
        .route("/captures/start", post(handlers::start_capture))
        .route("/captures/:capture_id/frames", post(handlers::push_frames))
        .route(
            "/captures/:capture_id/status",
            get(handlers::get_capture_status),
        )
        .route("/captures/:capture_id/stop", post(handlers::stop_capture))
        // Run queries and artifact downloads
        .route("/runs/:run_id", get(handlers::get_run))
        .route(
            "/runs/:run_id/transcript",
            get(handlers::download_transcript),
        )
        .route("/runs/:run_id/report", get(handlers::download_report))
        .route("/runs/:run_id/audio", get(handlers::download_audio))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        // Browser widgets post clips and frames cross-origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
