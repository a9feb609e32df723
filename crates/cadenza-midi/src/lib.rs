//! # Cadenza MIDI
//!
//! Standard MIDI File loading for the cadenza renderer.
//!
//! [`Score::load`] reads a format 0, 1 or 2 file, applies the tempo map
//! (or SMPTE timecode) and returns every channel event with an absolute
//! time in seconds. [`Score::notes`] pairs note-ons with note-offs for
//! inspection and validation.
//!
//! ```ignore
//! use cadenza_midi::Score;
//!
//! let score = Score::load("song.mid")?;
//! println!("{} events, {:.2} s", score.events().len(), score.duration_seconds());
//! ```

pub mod error;
mod score;
mod tempo;

pub use error::{Error, Result};
pub use score::{EventKind, Note, Score, ScoreEvent, ScoreTiming, PERCUSSION_CHANNEL};
pub use tempo::{TempoChange, DEFAULT_MICROS_PER_BEAT};
