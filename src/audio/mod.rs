pub mod clip;
pub mod frame;
pub mod wav;

pub use clip::{AudioClip, ClipOrigin, RECORDED_AUDIO_FILENAME};
pub use frame::PcmFrame;
pub use wav::WavInfo;
