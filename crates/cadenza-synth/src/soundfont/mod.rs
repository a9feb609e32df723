//! SoundFont synthesis via RustySynth.

mod engine;
mod library;

pub use engine::{resolve_preset, SoundFontEngine, PERCUSSION_BANK};
pub use library::{load_soundfont, BankLibrary};
