//! # Cadenza Analysis
//!
//! Short-time spectral analysis of rendered waveforms.
//!
//! - **STFT**: left-aligned frames, periodic Hann window centred in the FFT buffer
//! - **Mel filter bank**: Slaney mel scale, area-normalised triangles
//! - **dB scaling**: referenced to the map maximum, clamped to `-top_db`
//!
//! [`SpectralProcessor`] ties these together for a fixed
//! [`AudioConfig`](cadenza_core::AudioConfig). Everything operates on raw
//! `&[f32]` sample buffers.
//!
//! ## Example
//!
//! ```rust
//! use cadenza_analysis::SpectralProcessor;
//! use cadenza_core::AudioConfig;
//!
//! let config = AudioConfig::builder().use_mel(false).build().unwrap();
//! let mut processor = SpectralProcessor::new(config);
//!
//! let samples: Vec<f32> = (0..22050).map(|i| (i as f32 * 0.05).sin()).collect();
//! let spectrogram = processor.compute(&samples).unwrap();
//! assert_eq!(spectrogram.frequency_bins(), 1025);
//! ```

pub mod error;
pub mod mel;
pub mod processor;
pub mod scale;
pub mod stft;
pub mod window;

pub use error::{Error, Result};
pub use mel::{hz_to_mel, mel_to_hz, MelFilterBank};
pub use processor::SpectralProcessor;
pub use scale::{to_db, Scale};
pub use stft::Stft;
pub use window::{hann_periodic, pad_center};
