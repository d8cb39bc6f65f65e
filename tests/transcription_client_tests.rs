// Integration tests for the hosted transcription client
//
// These tests run the client against a local stub of the
// /audio/transcriptions endpoint, so no real API key or network is needed.

use anyhow::Result;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use transcorder::config::TranscriptionConfig;
use transcorder::{TranscribeError, TranscriptionClient};

async fn spawn_stub(app: Router) -> Result<(String, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok((format!("http://{}", addr), handle))
}

fn client_for(base_url: &str) -> TranscriptionClient {
    let config = TranscriptionConfig {
        base_url: base_url.to_string(),
        model: "whisper-large-v3".to_string(),
    };

    TranscriptionClient::new(&config).with_api_key("test-key")
}

fn write_clip(bytes: &[u8]) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("clip.wav");
    std::fs::write(&path, bytes)?;
    Ok((dir, path))
}

#[tokio::test]
async fn test_transcribe_posts_fixed_fields_and_returns_text() -> Result<()> {
    let app = Router::new().route(
        "/audio/transcriptions",
        post(|mut multipart: Multipart| async move {
            let mut saw_file = false;
            let mut fields = HashMap::new();

            while let Some(field) = multipart.next_field().await.unwrap() {
                let name = field.name().unwrap_or_default().to_string();
                if name == "file" {
                    saw_file = true;
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.unwrap();
                    fields.insert("filename".to_string(), filename);
                    fields.insert("file_len".to_string(), bytes.len().to_string());
                } else {
                    let value = field.text().await.unwrap();
                    fields.insert(name, value);
                }
            }

            assert!(saw_file, "Request should carry a file part");
            assert_eq!(
                fields.get("model").map(String::as_str),
                Some("whisper-large-v3")
            );
            assert_eq!(
                fields.get("prompt").map(String::as_str),
                Some("Transcreva o áudio a seguir em Português.")
            );
            assert_eq!(fields.get("temperature").map(String::as_str), Some("0"));
            assert_eq!(
                fields.get("response_format").map(String::as_str),
                Some("json")
            );
            assert_eq!(
                fields.get("filename").map(String::as_str),
                Some("gravacao.wav")
            );
            assert_eq!(fields.get("file_len").map(String::as_str), Some("13"));

            Json(json!({ "text": "olá mundo" }))
        }),
    );

    let (base_url, _server) = spawn_stub(app).await?;
    let client = client_for(&base_url);

    let (_dir, path) = write_clip(b"RIFF-fake-wav")?;
    let text = client.transcribe_file(&path, "gravacao.wav").await?;

    assert_eq!(text, "olá mundo");
    Ok(())
}

#[tokio::test]
async fn test_missing_text_field_decodes_as_empty() -> Result<()> {
    let app = Router::new().route("/audio/transcriptions", post(|| async { Json(json!({})) }));

    let (base_url, _server) = spawn_stub(app).await?;
    let client = client_for(&base_url);

    let (_dir, path) = write_clip(b"bytes")?;
    let text = client.transcribe_file(&path, "clip.wav").await?;

    assert_eq!(text, "", "Absent text field should decode as the empty string");
    Ok(())
}

#[tokio::test]
async fn test_api_error_status_and_body_are_reported() -> Result<()> {
    let app = Router::new().route(
        "/audio/transcriptions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response() }),
    );

    let (base_url, _server) = spawn_stub(app).await?;
    let client = client_for(&base_url);

    let (_dir, path) = write_clip(b"bytes")?;
    let result = client.transcribe_file(&path, "clip.wav").await;

    match result {
        Err(TranscribeError::Api { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("upstream exploded"));
        }
        other => panic!("Expected an API error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_api_key_fails_before_any_request() -> Result<()> {
    let client = TranscriptionClient::new(&TranscriptionConfig::default());

    assert!(!client.has_api_key());

    let (_dir, path) = write_clip(b"bytes")?;
    let result = client.transcribe_file(&path, "clip.wav").await;

    assert!(
        matches!(result, Err(TranscribeError::MissingApiKey(_))),
        "A key-less client should fail with MissingApiKey"
    );
    Ok(())
}

#[tokio::test]
async fn test_unreadable_staged_file_is_an_io_error() {
    let client = TranscriptionClient::new(&TranscriptionConfig::default()).with_api_key("test-key");

    let result = client
        .transcribe_file(Path::new("/nonexistent/clip.wav"), "clip.wav")
        .await;

    assert!(
        matches!(result, Err(TranscribeError::Io(_))),
        "Missing staged file should surface as an Io error"
    );
}
