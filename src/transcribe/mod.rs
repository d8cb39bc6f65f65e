//! Hosted speech-to-text client.

mod client;

pub use client::{TranscribeError, TranscriptionClient, TRANSCRIPTION_PROMPT};
