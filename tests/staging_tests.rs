// Integration tests for audio staging
//
// These tests verify that clips are written byte-for-byte to a temporary
// .wav path and that cleanup removes the file again.

use anyhow::Result;
use std::fs;
use transcorder::StagedAudio;

#[test]
fn test_staged_file_contains_exact_bytes() -> Result<()> {
    let bytes: Vec<u8> = (0u8..=255).cycle().take(4096).collect();

    let staged = StagedAudio::create(&bytes)?;

    let on_disk = fs::read(staged.path())?;
    assert_eq!(
        on_disk, bytes,
        "Staged file should match the clip byte-for-byte"
    );

    staged.cleanup()?;
    Ok(())
}

#[test]
fn test_staged_path_has_wav_suffix() -> Result<()> {
    let staged = StagedAudio::create(b"RIFF")?;

    let path = staged.path().to_path_buf();
    assert!(
        path.extension().map(|ext| ext == "wav").unwrap_or(false),
        "Staged path should end in .wav, got {}",
        path.display()
    );

    staged.cleanup()?;
    Ok(())
}

#[test]
fn test_two_staged_files_get_distinct_paths() -> Result<()> {
    let first = StagedAudio::create(b"first")?;
    let second = StagedAudio::create(b"second")?;

    assert_ne!(
        first.path(),
        second.path(),
        "Concurrent staged files should not collide"
    );

    first.cleanup()?;
    second.cleanup()?;
    Ok(())
}

#[test]
fn test_cleanup_removes_the_file() -> Result<()> {
    let staged = StagedAudio::create(b"payload")?;
    let path = staged.path().to_path_buf();

    assert!(path.exists(), "Staged file should exist before cleanup");

    staged.cleanup()?;

    assert!(!path.exists(), "Staged file should be gone after cleanup");
    Ok(())
}

#[test]
fn test_cleanup_reports_missing_file() -> Result<()> {
    let staged = StagedAudio::create(b"payload")?;

    // Remove the file out from under the handle
    fs::remove_file(staged.path())?;

    let result = staged.cleanup();
    assert!(
        result.is_err(),
        "Cleanup of an already-removed file should error"
    );
    Ok(())
}

#[test]
fn test_empty_clip_stages_as_empty_file() -> Result<()> {
    let staged = StagedAudio::create(&[])?;

    let on_disk = fs::read(staged.path())?;
    assert!(on_disk.is_empty(), "Empty clip should stage as an empty file");

    staged.cleanup()?;
    Ok(())
}
