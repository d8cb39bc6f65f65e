//! Temporary staging for captured audio.
//!
//! The transcription API wants a file in a multipart form, so every clip is
//! written to a throwaway `.wav` path first. The file is fully written and
//! closed before the path is handed out, and deletion afterwards is an
//! explicit, best-effort step owned by the caller: a failed delete is a
//! warning, the file is left on disk, and nothing retries.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const STAGING_PREFIX: &str = "transcorder-";
const STAGING_SUFFIX: &str = ".wav";

/// A clip staged to disk for the duration of one transcription call.
#[derive(Debug)]
pub struct StagedAudio {
    path: PathBuf,
}

impl StagedAudio {
    /// Write `bytes` to an auto-generated temp path and close the handle.
    pub fn create(bytes: &[u8]) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile()
            .context("Failed to create staging file")?;

        file.write_all(bytes)
            .context("Failed to write staged audio")?;
        file.flush().context("Failed to flush staged audio")?;

        // keep() hands ownership of the file to us; from here on deletion is
        // an explicit step, not a Drop side effect.
        let path = file
            .into_temp_path()
            .keep()
            .context("Failed to persist staging file")?;

        debug!("Staged {} bytes at {}", bytes.len(), path.display());

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file. Callers downgrade an error here to a warning
    /// and accept the leaked file.
    pub fn cleanup(self) -> std::io::Result<()> {
        fs::remove_file(&self.path)
    }
}
