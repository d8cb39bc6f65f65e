use anyhow::{Context, Result};
use std::io::Cursor;

/// Header-level facts about a WAV buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Total interleaved sample count across all channels.
    pub sample_count: u32,
}

/// Wrap raw 16-bit PCM samples in a WAV container, in memory.
pub fn encode_pcm(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let cursor = Cursor::new(&mut bytes);
        let mut writer =
            hound::WavWriter::new(cursor, spec).context("Failed to create WAV writer")?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .context("Failed to write sample to WAV")?;
        }

        writer.finalize().context("Failed to finalize WAV data")?;
    }

    Ok(bytes)
}

/// Read the header of an in-memory WAV buffer. Returns an error for anything
/// that is not a parseable WAV; callers treat that as "not WAV" and move on.
pub fn probe(bytes: &[u8]) -> Result<WavInfo> {
    let reader =
        hound::WavReader::new(Cursor::new(bytes)).context("Failed to parse WAV header")?;

    let spec = reader.spec();

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        sample_count: reader.len(),
    })
}
