//! Format-specific encoders

pub mod npy;
pub mod wav;

pub use npy::{decode_npy, encode_npy, read_npy, write_npy};
pub use wav::{encode_wav_mono_memory, read_wav_mono, write_wav_mono, BitDepth, WavConfig};
