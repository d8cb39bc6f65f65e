use super::stats::{format_elapsed, CaptureStats};
use crate::audio::{wav, AudioClip, ClipOrigin, PcmFrame, RECORDED_AUDIO_FILENAME};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Capacity of the frame channel between producers and the collector task.
const FRAME_CHANNEL_CAPACITY: usize = 256;

/// Configuration for a capture session
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Unique identifier for this capture
    pub capture_id: String,

    /// Sample rate of incoming PCM frames in Hz
    pub sample_rate: u32,

    /// Number of channels in incoming PCM frames
    pub channels: u16,
}

impl CaptureConfig {
    pub fn new(capture_id: impl Into<String>) -> Self {
        Self {
            capture_id: capture_id.into(),
            sample_rate: 48_000,
            channels: 1,
        }
    }
}

/// A live capture session that accumulates PCM frames until stopped
///
/// Frames are funneled through a channel into a single collector task, so
/// producers never contend on the sample buffer itself. Stopping the session
/// drains the channel, joins the collector, and encodes everything received
/// into a single WAV clip.
pub struct CaptureSession {
    /// Capture configuration
    config: CaptureConfig,

    /// When the capture started
    started_at: chrono::DateTime<chrono::Utc>,

    /// Monotonic start instant, used by the elapsed ticker
    started: Instant,

    /// Whether frames are currently accepted
    is_recording: Arc<AtomicBool>,

    /// Number of frames received
    frames_received: Arc<AtomicUsize>,

    /// Number of samples received
    samples_received: Arc<AtomicUsize>,

    /// Cosmetic "mm:ss" display, refreshed once per second while recording
    elapsed_display: Arc<RwLock<String>>,

    /// Sending side of the frame channel; dropped on stop to end the collector
    frame_tx: Mutex<Option<mpsc::Sender<PcmFrame>>>,

    /// Handle for the collector task, which yields the accumulated samples
    collector_handle: Mutex<Option<JoinHandle<Vec<i16>>>>,

    /// Handle for the elapsed ticker task
    ticker_handle: Mutex<Option<JoinHandle<()>>>,
}

impl CaptureSession {
    /// Create a new capture session (not yet recording)
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            started_at: Utc::now(),
            started: Instant::now(),
            is_recording: Arc::new(AtomicBool::new(false)),
            frames_received: Arc::new(AtomicUsize::new(0)),
            samples_received: Arc::new(AtomicUsize::new(0)),
            elapsed_display: Arc::new(RwLock::new(format_elapsed(0))),
            frame_tx: Mutex::new(None),
            collector_handle: Mutex::new(None),
            ticker_handle: Mutex::new(None),
        }
    }

    pub fn capture_id(&self) -> &str {
        &self.config.capture_id
    }

    /// Start accepting frames
    pub async fn start(&self) -> Result<()> {
        if self.is_recording.load(Ordering::SeqCst) {
            warn!("Capture already started: {}", self.config.capture_id);
            return Ok(());
        }

        info!("Starting capture session: {}", self.config.capture_id);

        self.is_recording.store(true, Ordering::SeqCst);

        let (frame_tx, mut frame_rx) = mpsc::channel::<PcmFrame>(FRAME_CHANNEL_CAPACITY);

        // Spawn collector task: the only writer to the sample buffer
        let frames_received = Arc::clone(&self.frames_received);
        let samples_received = Arc::clone(&self.samples_received);

        let collector_task = tokio::spawn(async move {
            let mut samples: Vec<i16> = Vec::new();

            while let Some(frame) = frame_rx.recv().await {
                frames_received.fetch_add(1, Ordering::SeqCst);
                samples_received.fetch_add(frame.samples.len(), Ordering::SeqCst);
                samples.extend_from_slice(&frame.samples);
            }

            samples
        });

        {
            let mut handle = self.collector_handle.lock().await;
            *handle = Some(collector_task);
        }

        // Spawn elapsed ticker task: refreshes the mm:ss display once per second
        let is_recording = Arc::clone(&self.is_recording);
        let elapsed_display = Arc::clone(&self.elapsed_display);
        let started = self.started;

        let ticker_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await; // first tick completes immediately

            while is_recording.load(Ordering::SeqCst) {
                interval.tick().await;

                let elapsed = started.elapsed().as_secs();
                let mut display = elapsed_display.write().await;
                *display = format_elapsed(elapsed);
            }
        });

        {
            let mut handle = self.ticker_handle.lock().await;
            *handle = Some(ticker_task);
        }

        {
            let mut tx = self.frame_tx.lock().await;
            *tx = Some(frame_tx);
        }

        Ok(())
    }

    /// Push a PCM frame into the capture
    ///
    /// Frames arriving before start or after stop are rejected.
    pub async fn push_frame(&self, frame: PcmFrame) -> Result<()> {
        if !self.is_recording.load(Ordering::SeqCst) {
            anyhow::bail!(
                "Capture {} is not recording, frame rejected",
                self.config.capture_id
            );
        }

        // Clone the sender out of the lock so the send does not hold it
        let tx = {
            let guard = self.frame_tx.lock().await;
            guard.clone()
        };

        match tx {
            Some(tx) => tx
                .send(frame)
                .await
                .context("Frame collector is no longer running"),
            None => anyhow::bail!(
                "Capture {} has no active frame channel",
                self.config.capture_id
            ),
        }
    }

    /// Stop the capture and encode everything received into a WAV clip
    pub async fn stop(&self) -> Result<(AudioClip, CaptureStats)> {
        if !self.is_recording.swap(false, Ordering::SeqCst) {
            anyhow::bail!("Capture {} is not recording", self.config.capture_id);
        }

        info!("Stopping capture session: {}", self.config.capture_id);

        // Drop the sender so the collector sees the channel close and finishes
        {
            let mut tx = self.frame_tx.lock().await;
            tx.take();
        }

        // Wait for the collector to drain remaining frames
        let samples = {
            let mut handle = self.collector_handle.lock().await;
            match handle.take() {
                Some(task) => task.await.context("Frame collector task panicked")?,
                None => Vec::new(),
            }
        };

        // The ticker exits on its next tick after the flag flips
        {
            let mut handle = self.ticker_handle.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    warn!("Elapsed ticker task panicked: {}", e);
                }
            }
        }

        let stats = self.stats().await;

        info!(
            "Capture session stopped: {} ({} frames, {} samples)",
            self.config.capture_id, stats.frames_received, stats.samples_received
        );

        let wav_bytes = wav::encode_pcm(&samples, self.config.sample_rate, self.config.channels)
            .context("Failed to encode captured samples as WAV")?;

        let clip = AudioClip::new(wav_bytes, ClipOrigin::Capture, RECORDED_AUDIO_FILENAME);

        Ok((clip, stats))
    }

    /// Get a snapshot of the capture state
    pub async fn stats(&self) -> CaptureStats {
        let duration = Utc::now().signed_duration_since(self.started_at);
        let elapsed_display = self.elapsed_display.read().await.clone();

        CaptureStats {
            is_recording: self.is_recording.load(Ordering::SeqCst),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            frames_received: self.frames_received.load(Ordering::SeqCst),
            samples_received: self.samples_received.load(Ordering::SeqCst),
            elapsed_display,
        }
    }
}
