use super::state::AppState;
use crate::audio::{wav, AudioClip, ClipOrigin, PcmFrame, RECORDED_AUDIO_FILENAME};
use crate::capture::{CaptureConfig, CaptureSession, CaptureStats};
use crate::pipeline::{RunRecord, REPORT_FILENAME, TRANSCRIPT_FILENAME};
use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartCaptureRequest {
    /// Optional capture ID (if not provided, generate UUID)
    pub capture_id: Option<String>,

    /// Sample rate of the pushed PCM frames (default: from config)
    pub sample_rate: Option<u32>,

    /// Channel count of the pushed PCM frames (default: from config)
    pub channels: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct StartCaptureResponse {
    pub capture_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct FramePayload {
    /// Base64-encoded little-endian 16-bit PCM
    pub pcm: String,

    /// Client-assigned sequence number, used for logging only
    #[serde(default)]
    pub seq: u32,
}

#[derive(Debug, Deserialize)]
pub struct PushFramesRequest {
    pub frames: Vec<FramePayload>,
}

#[derive(Debug, Serialize)]
pub struct PushFramesResponse {
    pub capture_id: String,
    pub frames_accepted: usize,
}

#[derive(Debug, Serialize)]
pub struct StopCaptureResponse {
    pub capture_id: String,
    pub status: String,
    pub message: String,
    pub stats: CaptureStats,
    pub run: RunRecord,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub transcription_key_present: bool,
    pub report_key_present: bool,
    pub report_backend: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Pipeline entry
// ============================================================================

/// Insert a run record for the clip and drive the pipeline to completion.
/// The caller waits for the whole thing; there is no background queue.
async fn execute_run(state: &AppState, clip: AudioClip) -> Result<RunRecord, Response> {
    if clip.is_empty() {
        warn!("Rejected empty audio clip from {:?}", clip.origin);
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Audio clip is empty; nothing to transcribe".to_string(),
            }),
        )
            .into_response());
    }

    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    let record = RunRecord::new(run_id.clone(), clip.origin, clip.bytes.clone());
    state.runs.insert(record).await;

    state.pipeline.execute(clip, &state.runs, &run_id).await;

    match state.runs.get(&run_id).await {
        Some(record) => Ok(record),
        None => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Run {} disappeared from the store", run_id),
            }),
        )
            .into_response()),
    }
}

/// Serve a text artifact as a named download.
fn text_attachment(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

// ============================================================================
// Audio intake handlers
// ============================================================================

/// POST /audio/upload
/// Run the pipeline on a file sent as multipart form data
pub async fn upload_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read multipart field: {}", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Malformed multipart upload: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        // file_name borrows the field; take an owned copy before bytes()
        let filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "upload.wav".to_string());

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to read uploaded file: {}", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read uploaded file: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        info!("Received upload {} ({} bytes)", filename, bytes.len());

        let clip = AudioClip::new(bytes.to_vec(), ClipOrigin::Upload, filename);

        return match execute_run(&state, clip).await {
            Ok(record) => (StatusCode::OK, Json(record)).into_response(),
            Err(response) => response,
        };
    }

    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Multipart upload carried no file field".to_string(),
        }),
    )
        .into_response()
}

/// POST /audio/clip
/// Run the pipeline on a raw WAV body produced by the recorder widget
pub async fn submit_clip(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    // Header probe is for the log only; the clip is sent on as-is either way.
    match wav::probe(&body) {
        Ok(info) => info!(
            "Received recorder clip: {} Hz, {} channel(s), {} samples",
            info.sample_rate, info.channels, info.sample_count
        ),
        Err(_) => warn!(
            "Recorder clip is not parseable WAV ({} bytes), sending as-is",
            body.len()
        ),
    }

    let clip = AudioClip::new(body.to_vec(), ClipOrigin::Recorder, RECORDED_AUDIO_FILENAME);

    match execute_run(&state, clip).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(response) => response,
    }
}

// ============================================================================
// Capture handlers
// ============================================================================

/// POST /captures/start
/// Start a new capture session
pub async fn start_capture(
    State(state): State<AppState>,
    Json(req): Json<StartCaptureRequest>,
) -> impl IntoResponse {
    let capture_id = req
        .capture_id
        .unwrap_or_else(|| format!("capture-{}", uuid::Uuid::new_v4()));

    info!("Starting capture: {}", capture_id);

    // Check if already capturing
    {
        let captures = state.captures.read().await;
        if captures.contains_key(&capture_id) {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Capture {} is already recording", capture_id),
                }),
            )
                .into_response();
        }
    }

    let mut config = CaptureConfig::new(capture_id.clone());
    config.sample_rate = req.sample_rate.unwrap_or(state.config.audio.sample_rate);
    config.channels = req.channels.unwrap_or(state.config.audio.channels);

    let session = Arc::new(CaptureSession::new(config));

    if let Err(e) = session.start().await {
        error!("Failed to start capture: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to start capture: {}", e),
            }),
        )
            .into_response();
    }

    // Store session
    {
        let mut captures = state.captures.write().await;
        captures.insert(capture_id.clone(), session);
    }

    info!("Capture started: {}", capture_id);

    (
        StatusCode::OK,
        Json(StartCaptureResponse {
            capture_id: capture_id.clone(),
            status: "recording".to_string(),
            message: format!("Capture {} started", capture_id),
        }),
    )
        .into_response()
}

/// POST /captures/:capture_id/frames
/// Push a batch of PCM frames into a capture session
pub async fn push_frames(
    State(state): State<AppState>,
    Path(capture_id): Path<String>,
    Json(req): Json<PushFramesRequest>,
) -> impl IntoResponse {
    let session = {
        let captures = state.captures.read().await;
        captures.get(&capture_id).cloned()
    };

    let session = match session {
        Some(session) => session,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Capture {} not found", capture_id),
                }),
            )
                .into_response();
        }
    };

    let mut frames_accepted = 0usize;

    for (index, payload) in req.frames.iter().enumerate() {
        let pcm = match base64::engine::general_purpose::STANDARD.decode(&payload.pcm) {
            Ok(pcm) => pcm,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Frame {} is not valid base64: {}", index, e),
                    }),
                )
                    .into_response();
            }
        };

        let frame = PcmFrame::from_le_bytes(&pcm, payload.seq);

        if let Err(e) = session.push_frame(frame).await {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Frame {} rejected: {}", index, e),
                }),
            )
                .into_response();
        }

        frames_accepted += 1;
    }

    (
        StatusCode::OK,
        Json(PushFramesResponse {
            capture_id,
            frames_accepted,
        }),
    )
        .into_response()
}

/// GET /captures/:capture_id/status
/// Get status of a capture session
pub async fn get_capture_status(
    State(state): State<AppState>,
    Path(capture_id): Path<String>,
) -> impl IntoResponse {
    let captures = state.captures.read().await;

    match captures.get(&capture_id) {
        Some(session) => {
            let stats = session.stats().await;
            (StatusCode::OK, Json(stats)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Capture {} not found", capture_id),
            }),
        )
            .into_response(),
    }
}

/// POST /captures/:capture_id/stop
/// Stop a capture session and run the pipeline on everything it received
pub async fn stop_capture(
    State(state): State<AppState>,
    Path(capture_id): Path<String>,
) -> impl IntoResponse {
    info!("Stopping capture: {}", capture_id);

    // Find and remove the session; frames arriving from here on get 404
    let session = {
        let mut captures = state.captures.write().await;
        captures.remove(&capture_id)
    };

    let session = match session {
        Some(session) => session,
        None => {
            error!("Capture {} not found", capture_id);
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Capture {} not found", capture_id),
                }),
            )
                .into_response();
        }
    };

    let (clip, stats) = match session.stop().await {
        Ok(stopped) => stopped,
        Err(e) => {
            error!("Failed to stop capture: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to stop capture: {}", e),
                }),
            )
                .into_response();
        }
    };

    if stats.samples_received == 0 {
        warn!("Capture {} received no audio; pipeline not started", capture_id);
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: format!("Capture {} received no audio", capture_id),
            }),
        )
            .into_response();
    }

    match execute_run(&state, clip).await {
        Ok(run) => (
            StatusCode::OK,
            Json(StopCaptureResponse {
                capture_id: capture_id.clone(),
                status: "stopped".to_string(),
                message: format!("Capture {} stopped", capture_id),
                stats,
                run,
            }),
        )
            .into_response(),
        Err(response) => response,
    }
}

// ============================================================================
// Run handlers
// ============================================================================

/// GET /runs/:run_id
/// Get the full record of a pipeline run
pub async fn get_run(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> impl IntoResponse {
    match state.runs.get(&run_id).await {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Run {} not found", run_id),
            }),
        )
            .into_response(),
    }
}

/// GET /runs/:run_id/transcript
/// Download the transcript as transcricao.txt
pub async fn download_transcript(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> impl IntoResponse {
    let record = match state.runs.get(&run_id).await {
        Some(record) => record,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Run {} not found", run_id),
                }),
            )
                .into_response();
        }
    };

    if record.transcript.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Run {} produced no transcript", run_id),
            }),
        )
            .into_response();
    }

    text_attachment(TRANSCRIPT_FILENAME, record.transcript)
}

/// GET /runs/:run_id/report
/// Download the report as relatorio.txt
pub async fn download_report(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> impl IntoResponse {
    let record = match state.runs.get(&run_id).await {
        Some(record) => record,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Run {} not found", run_id),
                }),
            )
                .into_response();
        }
    };

    if record.report.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Run {} produced no report", run_id),
            }),
        )
            .into_response();
    }

    text_attachment(REPORT_FILENAME, record.report)
}

/// GET /runs/:run_id/audio
/// Download the acquired audio as gravacao.wav
pub async fn download_audio(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> impl IntoResponse {
    let record = match state.runs.get(&run_id).await {
        Some(record) => record,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Run {} not found", run_id),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", RECORDED_AUDIO_FILENAME),
            ),
        ],
        record.audio,
    )
        .into_response()
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
/// Health check with credential presence flags
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            service: state.config.service.name.clone(),
            transcription_key_present: state.pipeline.transcription_ready(),
            report_key_present: state.pipeline.report_ready(),
            report_backend: state.pipeline.report_backend().to_string(),
        }),
    )
}
