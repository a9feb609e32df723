//! # Cadenza - MIDI to spectrogram features
//!
//! Turns Standard MIDI Files into time-frequency arrays for training
//! audio models: SoundFont synthesis, short-time spectral analysis and
//! NPY export behind a single call.
//!
//! ## Architecture
//!
//! Cadenza is an umbrella crate that coordinates:
//! - **cadenza-core** - `AudioConfig`, `Waveform`, `SpectralMap`
//! - **cadenza-midi** - SMF parsing with tempo maps
//! - **cadenza-synth** - Offline rendering (RustySynth SoundFont engine)
//! - **cadenza-analysis** - STFT, mel filter bank, dB scaling
//! - **cadenza-export** - Atomic WAV and NPY writers
//!
//! ## Quick Start
//!
//! ```ignore
//! use cadenza::prelude::*;
//! use std::path::Path;
//!
//! let config = AudioConfig::default();
//! let mut pipeline = FeaturePipeline::new("assets/soundfonts/TimGM6mb.sf2", config)?;
//!
//! let features = pipeline.process(
//!     "song.mid",
//!     Some(Path::new("song.wav")),
//!     Some(Path::new("song.npy")),
//! )?;
//! assert_eq!(features.frequency_bins(), 128);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default) - Deserialize `AudioConfig` through its validating builder
//! - `cli` - The `cadenza` command-line tool

pub mod batch;
pub mod error;
pub mod pipeline;

pub use batch::{BatchJob, BatchProcessor, BatchResult, BatchSummary};
pub use error::{Error, ErrorKind, Result};
pub use pipeline::{FeaturePipeline, PipelineOutput};

/// Re-exports of the stage crates for direct access
pub use cadenza_analysis as analysis;
pub use cadenza_core as core;
pub use cadenza_export as export;
pub use cadenza_midi as midi;
pub use cadenza_synth as synth;

pub use cadenza_analysis::SpectralProcessor;
pub use cadenza_core::{
    ArtifactKind, ArtifactWarning, AudioConfig, AudioConfigBuilder, MapStats, SpectralMap,
    Waveform,
};
pub use cadenza_midi::Score;
pub use cadenza_synth::{
    BankLibrary, MidiRenderer, OscillatorEngine, RenderOutput, RenderSettings, SoundFontEngine,
    SynthEngine,
};

/// Everything needed for typical use.
pub mod prelude {
    pub use crate::{
        AudioConfig, BatchJob, BatchProcessor, Error, ErrorKind, FeaturePipeline, MidiRenderer,
        PipelineOutput, RenderSettings, Result, SpectralMap, SpectralProcessor, Waveform,
    };
}
