//! Render settings.

/// Polyphony range accepted by the SoundFont engine.
pub const MIN_POLYPHONY: usize = 8;
pub const MAX_POLYPHONY: usize = 256;

/// How a score is turned into a waveform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Extra seconds rendered after the last event, for release tails.
    pub tail_seconds: f64,
    /// Scale the waveform so its peak is 1.0 (silent output is left alone).
    pub normalize: bool,
    /// Apply the SoundFont engine's built-in reverb and chorus.
    pub reverb_and_chorus: bool,
    /// Voice limit for the SoundFont engine.
    pub max_polyphony: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tail_seconds: 0.0,
            normalize: true,
            reverb_and_chorus: true,
            max_polyphony: 64,
        }
    }
}

impl RenderSettings {
    /// Negative or non-finite values become zero.
    pub fn tail_seconds(mut self, seconds: f64) -> Self {
        self.tail_seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn reverb_and_chorus(mut self, enabled: bool) -> Self {
        self.reverb_and_chorus = enabled;
        self
    }

    /// Clamped to [`MIN_POLYPHONY`]..=[`MAX_POLYPHONY`].
    pub fn max_polyphony(mut self, voices: usize) -> Self {
        self.max_polyphony = voices.clamp(MIN_POLYPHONY, MAX_POLYPHONY);
        self
    }
}
