//! Synthesis engine abstraction driven by the renderer.

use crate::error::Result;
use crate::settings::RenderSettings;
use cadenza_midi::{EventKind, Score};

/// A stereo sound source that accepts MIDI channel events.
///
/// The renderer calls [`check`](Self::check) and [`reset`](Self::reset) once
/// per score, then interleaves [`apply`](Self::apply) and
/// [`render`](Self::render) in time order. After `reset` the engine must
/// behave as if freshly constructed.
pub trait SynthEngine: Send {
    /// Output sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Reject a score this engine cannot play, before any audio is produced.
    fn check(&self, _score: &Score) -> Result<()> {
        Ok(())
    }

    /// Discard all voices and controller state and adopt `settings`.
    fn reset(&mut self, settings: &RenderSettings) -> Result<()>;

    /// Handle one channel event at the current position.
    fn apply(&mut self, channel: u8, event: &EventKind);

    /// Produce the next `left.len()` samples. Buffers have equal length.
    fn render(&mut self, left: &mut [f32], right: &mut [f32]);
}
