//! SoundFont engine wrapping RustySynth.

use crate::engine::SynthEngine;
use crate::error::{Error, Result};
use crate::settings::RenderSettings;
use cadenza_midi::{EventKind, Score, PERCUSSION_CHANNEL};
use rustysynth::{SoundFont, Synthesizer, SynthesizerSettings};
use std::collections::HashSet;
use std::sync::Arc;

/// Bank number RustySynth assigns to percussion presets.
pub const PERCUSSION_BANK: i32 = 128;

const BANK_SELECT: u8 = 0;

fn preset_id(bank: i32, program: i32) -> i32 {
    (bank << 16) | program
}

/// Preset a channel with `bank` and `program` will play, following the
/// General MIDI fallback the synthesizer applies: melodic banks fall back
/// to bank 0 with the same program, percussion banks to the standard kit
/// (bank 128, program 0).
pub fn resolve_preset(available: &HashSet<i32>, bank: i32, program: i32) -> Option<(i32, i32)> {
    if available.contains(&preset_id(bank, program)) {
        return Some((bank, program));
    }
    let fallback = if bank < PERCUSSION_BANK {
        (0, program)
    } else {
        (PERCUSSION_BANK, 0)
    };
    available
        .contains(&preset_id(fallback.0, fallback.1))
        .then_some(fallback)
}

/// Renders through a RustySynth synthesizer.
///
/// The parsed bank is shared; the synthesizer is rebuilt on every
/// [`reset`](SynthEngine::reset), so no voice or controller state survives
/// between scores.
pub struct SoundFontEngine {
    soundfont: Arc<SoundFont>,
    sample_rate: u32,
    presets: HashSet<i32>,
    synthesizer: Synthesizer,
}

impl SoundFontEngine {
    /// Fails if the synthesizer rejects the sample rate (16 kHz to 192 kHz).
    pub fn new(soundfont: Arc<SoundFont>, sample_rate: u32, settings: &RenderSettings) -> Result<Self> {
        let synthesizer = Self::build(&soundfont, sample_rate, settings)?;
        let presets = soundfont
            .get_presets()
            .iter()
            .map(|p| preset_id(p.get_bank_number(), p.get_patch_number()))
            .collect();

        Ok(Self {
            soundfont,
            sample_rate,
            presets,
            synthesizer,
        })
    }

    fn build(soundfont: &Arc<SoundFont>, sample_rate: u32, settings: &RenderSettings) -> Result<Synthesizer> {
        let rate = i32::try_from(sample_rate)
            .map_err(|_| Error::Synthesis(format!("Unsupported sample rate: {} Hz", sample_rate)))?;

        let mut synth_settings = SynthesizerSettings::new(rate);
        synth_settings.enable_reverb_and_chorus = settings.reverb_and_chorus;
        synth_settings.maximum_polyphony = settings.max_polyphony;

        Synthesizer::new(soundfont, &synth_settings)
            .map_err(|e| Error::Synthesis(format!("Failed to create synthesizer at {} Hz: {}", sample_rate, e)))
    }

    pub fn soundfont(&self) -> &Arc<SoundFont> {
        &self.soundfont
    }

    /// Whether the bank has an exact `(bank, program)` preset.
    pub fn has_preset(&self, bank: i32, program: i32) -> bool {
        self.presets.contains(&preset_id(bank, program))
    }

    /// Preset actually used for `(bank, program)`, if any.
    pub fn resolve(&self, bank: i32, program: i32) -> Option<(i32, i32)> {
        resolve_preset(&self.presets, bank, program)
    }
}

impl SynthEngine for SoundFontEngine {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Every sounding note must resolve to a preset.
    fn check(&self, score: &Score) -> Result<()> {
        let mut banks = [0i32; 16];
        banks[PERCUSSION_CHANNEL as usize] = PERCUSSION_BANK;
        let mut programs = [0i32; 16];

        for event in score.events() {
            let ch = (event.channel & 0x0F) as usize;
            match event.kind {
                EventKind::ControlChange {
                    controller: BANK_SELECT,
                    value,
                } => {
                    banks[ch] = value as i32;
                    if ch == PERCUSSION_CHANNEL as usize {
                        banks[ch] += PERCUSSION_BANK;
                    }
                }
                EventKind::ProgramChange { program } => programs[ch] = program as i32,
                EventKind::NoteOn { key, velocity } if velocity > 0 => {
                    if self.resolve(banks[ch], programs[ch]).is_none() {
                        return Err(Error::Synthesis(format!(
                            "No preset for bank {} program {} (channel {}, key {} at {:.3}s)",
                            banks[ch],
                            programs[ch],
                            ch + 1,
                            key,
                            event.time_seconds
                        )));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn reset(&mut self, settings: &RenderSettings) -> Result<()> {
        self.synthesizer = Self::build(&self.soundfont, self.sample_rate, settings)?;
        Ok(())
    }

    fn apply(&mut self, channel: u8, event: &EventKind) {
        let (status, data1, data2) = event.to_message();
        self.synthesizer.process_midi_message(
            channel as i32,
            status as i32,
            data1 as i32,
            data2 as i32,
        );
    }

    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.synthesizer.render(left, right);
    }
}
