//! # Cadenza Synth
//!
//! Offline rendering of MIDI scores to mono waveforms.
//!
//! - [`MidiRenderer`]: loads a score, schedules its events sample-accurately
//!   and downmixes the engine's stereo output
//! - [`SoundFontEngine`]: SoundFont 2 synthesis via RustySynth
//! - [`OscillatorEngine`]: bank-less sine voices for tests and previews
//! - [`BankLibrary`]: parse each SoundFont once and share it across renderers
//!
//! ## Example
//!
//! ```ignore
//! use cadenza_synth::{MidiRenderer, RenderSettings};
//!
//! let mut renderer = MidiRenderer::new("assets/soundfonts/TimGM6mb.sf2", 22050)?
//!     .with_settings(RenderSettings::default().tail_seconds(1.0));
//! let output = renderer.render_to("song.mid", Some(Path::new("song.wav")))?;
//! for warning in &output.warnings {
//!     eprintln!("{}", warning);
//! }
//! ```

mod engine;
pub mod error;
mod oscillator;
mod renderer;
mod settings;
pub mod soundfont;

pub use engine::SynthEngine;
pub use error::{Error, Result};
pub use oscillator::OscillatorEngine;
pub use renderer::{save_waveform, MidiRenderer, RenderOutput};
pub use settings::{RenderSettings, MAX_POLYPHONY, MIN_POLYPHONY};
pub use soundfont::{load_soundfont, BankLibrary, SoundFontEngine};

// Re-export so callers can hold banks without depending on rustysynth directly
pub use rustysynth::SoundFont;
