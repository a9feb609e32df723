//! Offline score rendering.

use crate::engine::SynthEngine;
use crate::error::{Error, Result};
use crate::oscillator::OscillatorEngine;
use crate::settings::RenderSettings;
use crate::soundfont::{load_soundfont, SoundFontEngine};
use cadenza_core::{ArtifactKind, ArtifactWarning, Waveform};
use cadenza_export::{write_wav_mono, WavConfig};
use cadenza_midi::Score;
use rustysynth::SoundFont;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// A rendered waveform plus any side-artifact failures.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub waveform: Waveform,
    pub warnings: Vec<ArtifactWarning>,
}

/// Turns MIDI files into mono waveforms.
///
/// The bank is validated and parsed once at construction. Each render
/// starts from a reset engine, so output depends only on the score, the
/// bank and the settings.
pub struct MidiRenderer {
    engine: Box<dyn SynthEngine>,
    settings: RenderSettings,
}

impl MidiRenderer {
    /// Load a SoundFont and build a renderer at `sample_rate`.
    pub fn new(bank_path: impl AsRef<Path>, sample_rate: u32) -> Result<Self> {
        let soundfont = load_soundfont(bank_path.as_ref())?;
        Self::from_soundfont(soundfont, sample_rate)
    }

    /// Build a renderer over an already-parsed bank.
    pub fn from_soundfont(soundfont: Arc<SoundFont>, sample_rate: u32) -> Result<Self> {
        let settings = RenderSettings::default();
        let engine = SoundFontEngine::new(soundfont, sample_rate, &settings)?;
        Ok(Self {
            engine: Box::new(engine),
            settings,
        })
    }

    /// Render through a custom engine.
    pub fn with_engine(engine: impl SynthEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
            settings: RenderSettings::default(),
        }
    }

    /// Bank-less renderer using [`OscillatorEngine`].
    pub fn oscillator(sample_rate: u32) -> Self {
        Self::with_engine(OscillatorEngine::new(sample_rate))
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn sample_rate(&self) -> u32 {
        self.engine.sample_rate()
    }

    /// Render a MIDI file.
    pub fn render(&mut self, score_path: impl AsRef<Path>) -> Result<Waveform> {
        let score = Score::load(score_path)?;
        self.render_score(&score)
    }

    /// Render a MIDI file and optionally write it as a mono WAV.
    ///
    /// A failed WAV write is reported in [`RenderOutput::warnings`], not as
    /// an error.
    pub fn render_to(&mut self, score_path: impl AsRef<Path>, wave_path: Option<&Path>) -> Result<RenderOutput> {
        let waveform = self.render(score_path)?;
        let warnings = wave_path
            .and_then(|path| save_waveform(&waveform, path))
            .into_iter()
            .collect();

        Ok(RenderOutput { waveform, warnings })
    }

    /// Render a parsed score.
    ///
    /// Length is `round((duration + tail) * sample_rate)` samples and each
    /// event lands on sample `round(time * sample_rate)`.
    pub fn render_score(&mut self, score: &Score) -> Result<Waveform> {
        let sample_rate = self.engine.sample_rate();
        let rate = sample_rate as f64;

        self.engine.check(score)?;
        self.engine.reset(&self.settings)?;

        let total = ((score.duration_seconds() + self.settings.tail_seconds) * rate).round() as usize;
        let mut left = vec![0.0f32; total];
        let mut right = vec![0.0f32; total];
        let mut cursor = 0;

        for event in score.events() {
            let at = ((event.time_seconds * rate).round() as usize).min(total);
            if at > cursor {
                self.engine.render(&mut left[cursor..at], &mut right[cursor..at]);
                cursor = at;
            }
            self.engine.apply(event.channel, &event.kind);
        }
        if cursor < total {
            self.engine.render(&mut left[cursor..], &mut right[cursor..]);
        }

        let mut samples: Vec<f32> = left.iter().zip(&right).map(|(l, r)| (l + r) * 0.5).collect();

        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(Error::Synthesis(format!(
                "Engine produced a non-finite sample at {}",
                index
            )));
        }

        if self.settings.normalize {
            normalize_peak(&mut samples);
        }

        debug!(
            "Rendered {} events into {} samples ({:.2}s at {} Hz)",
            score.events().len(),
            total,
            total as f64 / rate,
            sample_rate
        );

        Ok(Waveform::new(samples, sample_rate))
    }
}

/// Write `waveform` as 16-bit mono WAV, logging and returning any failure.
pub fn save_waveform(waveform: &Waveform, path: &Path) -> Option<ArtifactWarning> {
    let config = WavConfig::pcm16(waveform.sample_rate());
    let e = write_wav_mono(path, waveform.samples(), &config).err()?;
    let warning = ArtifactWarning::new(ArtifactKind::Waveform, path, e.to_string());
    warn!("{}", warning);
    Some(warning)
}

/// Scale so the largest magnitude is 1.0. Silence is left untouched.
fn normalize_peak(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    if peak > 0.0 {
        let gain = 1.0 / peak;
        for s in samples.iter_mut() {
            *s *= gain;
        }
    }
}
