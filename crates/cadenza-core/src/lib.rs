//! # Cadenza Core
//!
//! Value types shared by every stage of the feature pipeline:
//!
//! - **[`AudioConfig`]** - Immutable sample-rate and transform parameters
//! - **[`Waveform`]** - Mono samples produced by the renderer
//! - **[`SpectralMap`]** - `(frequency_bins, time_frames)` feature array
//! - **[`ArtifactWarning`]** - Non-fatal failure to persist a side artifact
//!
//! No I/O and no numerical work happens here.

pub mod artifact;
pub mod config;
pub mod error;
pub mod spectral_map;
pub mod waveform;

pub use artifact::{ArtifactKind, ArtifactWarning};
pub use config::{
    AudioConfig, AudioConfigBuilder, DEFAULT_HOP_LENGTH, DEFAULT_N_FFT, DEFAULT_N_MELS,
    DEFAULT_SAMPLE_RATE, DEFAULT_TOP_DB, DEFAULT_WIN_LENGTH,
};
pub use error::{Error, Result};
pub use spectral_map::{MapStats, SpectralMap};
pub use waveform::Waveform;
