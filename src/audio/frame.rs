/// One PCM frame pushed into a capture session (16-bit interleaved samples).
#[derive(Debug, Clone)]
pub struct PcmFrame {
    pub samples: Vec<i16>,
    /// Client-assigned sequence number, used only for logging.
    pub seq: u32,
}

impl PcmFrame {
    pub fn new(samples: Vec<i16>, seq: u32) -> Self {
        Self { samples, seq }
    }

    /// Decode little-endian 16-bit PCM bytes. A trailing odd byte is dropped.
    pub fn from_le_bytes(pcm: &[u8], seq: u32) -> Self {
        let samples = pcm
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Self { samples, seq }
    }
}
