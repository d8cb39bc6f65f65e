// Integration tests for live capture sessions
//
// These tests verify that pushed PCM frames are accumulated in order and
// finalized into a single mono 16-bit WAV clip when the session stops.

use anyhow::Result;
use std::io::Cursor;
use std::time::Duration;
use transcorder::audio::wav;
use transcorder::capture::format_elapsed;
use transcorder::{CaptureConfig, CaptureSession, ClipOrigin, PcmFrame, RECORDED_AUDIO_FILENAME};

#[tokio::test]
async fn test_capture_accumulates_all_samples() -> Result<()> {
    let session = CaptureSession::new(CaptureConfig::new("test-capture"));
    session.start().await?;

    // Push 10 frames of 480 samples each
    for seq in 0..10u32 {
        let samples = vec![seq as i16; 480];
        session.push_frame(PcmFrame::new(samples, seq)).await?;
    }

    let (clip, stats) = session.stop().await?;

    assert_eq!(stats.frames_received, 10, "All frames should be counted");
    assert_eq!(stats.samples_received, 4800, "All samples should be counted");
    assert!(!stats.is_recording, "Session should not be recording after stop");

    // Verify: the clip decodes as mono 16-bit 48kHz WAV holding every sample
    let info = wav::probe(&clip.bytes)?;
    assert_eq!(info.channels, 1, "Capture clip should be mono");
    assert_eq!(info.bits_per_sample, 16, "Capture clip should be 16-bit");
    assert_eq!(info.sample_rate, 48_000, "Capture clip should be 48kHz");
    assert_eq!(info.sample_count, 4800, "Clip should hold every pushed sample");

    assert_eq!(clip.origin, ClipOrigin::Capture);
    assert_eq!(clip.filename, RECORDED_AUDIO_FILENAME);

    Ok(())
}

#[tokio::test]
async fn test_capture_preserves_frame_order() -> Result<()> {
    let session = CaptureSession::new(CaptureConfig::new("ordered-capture"));
    session.start().await?;

    for seq in 0..5u32 {
        session
            .push_frame(PcmFrame::new(vec![seq as i16 * 100; 3], seq))
            .await?;
    }

    let (clip, _stats) = session.stop().await?;

    let mut reader = hound::WavReader::new(Cursor::new(&clip.bytes[..]))?;
    let samples: Vec<i16> = reader.samples::<i16>().collect::<Result<_, _>>()?;

    assert_eq!(
        samples,
        vec![0, 0, 0, 100, 100, 100, 200, 200, 200, 300, 300, 300, 400, 400, 400],
        "Samples should appear in push order"
    );

    Ok(())
}

#[tokio::test]
async fn test_custom_sample_rate_is_encoded() -> Result<()> {
    let mut config = CaptureConfig::new("rate-capture");
    config.sample_rate = 16_000;

    let session = CaptureSession::new(config);
    session.start().await?;
    session.push_frame(PcmFrame::new(vec![7; 160], 0)).await?;

    let (clip, _stats) = session.stop().await?;

    let info = wav::probe(&clip.bytes)?;
    assert_eq!(info.sample_rate, 16_000, "Configured rate should reach the WAV header");

    Ok(())
}

#[tokio::test]
async fn test_push_before_start_is_rejected() {
    let session = CaptureSession::new(CaptureConfig::new("unstarted-capture"));

    let result = session.push_frame(PcmFrame::new(vec![0; 10], 0)).await;
    assert!(result.is_err(), "Frames before start should be rejected");
}

#[tokio::test]
async fn test_push_after_stop_is_rejected() -> Result<()> {
    let session = CaptureSession::new(CaptureConfig::new("stopped-capture"));
    session.start().await?;

    session.push_frame(PcmFrame::new(vec![1, 2, 3], 0)).await?;
    session.stop().await?;

    let result = session.push_frame(PcmFrame::new(vec![4, 5, 6], 1)).await;
    assert!(result.is_err(), "Frames after stop should be rejected");

    Ok(())
}

#[tokio::test]
async fn test_empty_capture_produces_header_only_wav() -> Result<()> {
    let session = CaptureSession::new(CaptureConfig::new("empty-capture"));
    session.start().await?;

    let (clip, stats) = session.stop().await?;

    assert_eq!(stats.frames_received, 0);
    assert_eq!(stats.samples_received, 0);

    let info = wav::probe(&clip.bytes)?;
    assert_eq!(info.sample_count, 0, "Empty capture should encode zero samples");

    Ok(())
}

#[tokio::test]
async fn test_double_stop_errors() -> Result<()> {
    let session = CaptureSession::new(CaptureConfig::new("double-stop"));
    session.start().await?;
    session.stop().await?;

    let result = session.stop().await;
    assert!(result.is_err(), "Second stop should error");

    Ok(())
}

#[tokio::test]
async fn test_stats_right_after_start() -> Result<()> {
    let session = CaptureSession::new(CaptureConfig::new("live-stats"));
    session.start().await?;

    let stats = session.stats().await;
    assert!(stats.is_recording, "Stats should report recording after start");
    assert_eq!(stats.frames_received, 0);
    assert!(
        stats.elapsed_display.starts_with("00:0"),
        "Display should still be in the first seconds, got {}",
        stats.elapsed_display
    );

    session.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_elapsed_display_ticks_while_recording() -> Result<()> {
    let session = CaptureSession::new(CaptureConfig::new("ticker-capture"));
    session.start().await?;

    // Give the once-per-second ticker time for at least one refresh
    tokio::time::sleep(Duration::from_millis(2100)).await;

    let stats = session.stats().await;
    assert_ne!(
        stats.elapsed_display, "00:00",
        "Display should have advanced past 00:00"
    );
    assert!(
        stats.elapsed_display.starts_with("00:0"),
        "Display should still be under ten seconds, got {}",
        stats.elapsed_display
    );

    session.stop().await?;
    Ok(())
}

#[test]
fn test_format_elapsed_pads_minutes_and_seconds() {
    assert_eq!(format_elapsed(0), "00:00");
    assert_eq!(format_elapsed(5), "00:05");
    assert_eq!(format_elapsed(65), "01:05");
    assert_eq!(format_elapsed(600), "10:00");
}

#[test]
fn test_format_elapsed_keeps_counting_minutes_past_an_hour() {
    assert_eq!(format_elapsed(3_725), "62:05");
}

#[test]
fn test_pcm_frame_decodes_little_endian() {
    let frame = PcmFrame::from_le_bytes(&[0x01, 0x00, 0xFF, 0x7F, 0x00, 0x80], 7);

    assert_eq!(frame.samples, vec![1, i16::MAX, i16::MIN]);
    assert_eq!(frame.seq, 7);
}

#[test]
fn test_pcm_frame_drops_trailing_odd_byte() {
    let frame = PcmFrame::from_le_bytes(&[0x01, 0x00, 0xAB], 0);

    assert_eq!(frame.samples, vec![1], "Odd trailing byte should be dropped");
}
