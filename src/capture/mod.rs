//! Live capture sessions
//!
//! A capture session accepts PCM frames pushed over the API, accumulates them
//! in order through a collector task, and produces a single WAV clip when
//! stopped. A ticker task keeps a cosmetic "mm:ss" elapsed display current
//! while recording.

pub mod session;
pub mod stats;

pub use session::{CaptureConfig, CaptureSession};
pub use stats::{format_elapsed, CaptureStats};
