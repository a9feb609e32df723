//! # Cadenza Export
//!
//! Persistence for pipeline artifacts:
//! - **Waveforms**: mono WAV via hound (16-bit PCM by default)
//! - **Feature maps**: NumPy `.npy` float32 arrays
//!
//! Every file is written through [`atomic_write`], so a failed export never
//! leaves a partial file at the destination.
//!
//! ```ignore
//! use cadenza_export::{write_npy, write_wav_mono, WavConfig};
//!
//! write_wav_mono(Path::new("song.wav"), waveform.samples(), &WavConfig::pcm16(22050))?;
//! write_npy(Path::new("song.npy"), &features)?;
//! ```

pub mod atomic;
pub mod error;
pub mod format;

pub use atomic::atomic_write;
pub use error::{ExportError, Result};
pub use format::npy::{decode_npy, encode_npy, read_npy, write_npy};
pub use format::wav::{
    encode_wav_mono_memory, read_wav_mono, write_wav_mono, BitDepth, WavConfig,
};

use std::path::Path;

/// Artifact formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Wav,
    Npy,
}

impl ArtifactFormat {
    /// File extension (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Wav => "wav",
            ArtifactFormat::Npy => "npy",
        }
    }

    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("wav") => Ok(ArtifactFormat::Wav),
            Some("npy") => Ok(ArtifactFormat::Npy),
            _ => Err(ExportError::UnsupportedFormat(format!(
                "Unknown or unsupported file extension: {}. Supported: .wav, .npy",
                path.display()
            ))),
        }
    }
}
