//! Additive sine engine.
//!
//! One sine voice per sounding note with a linear attack/release envelope.
//! Needs no sample bank and is fully deterministic, so it backs tests and
//! quick previews.

use crate::engine::SynthEngine;
use crate::error::Result;
use crate::settings::RenderSettings;
use cadenza_midi::EventKind;

const ATTACK_SECONDS: f32 = 0.005;
const RELEASE_SECONDS: f32 = 0.05;
/// Per-voice gain at full velocity
const VOICE_GAIN: f32 = 0.2;
const BEND_RANGE_SEMITONES: f32 = 2.0;

const CHANNEL_VOLUME: u8 = 7;
const ALL_SOUND_OFF: u8 = 120;
const RESET_ALL_CONTROLLERS: u8 = 121;
const ALL_NOTES_OFF: u8 = 123;

#[derive(Debug, Clone)]
struct Voice {
    channel: u8,
    key: u8,
    gain: f32,
    phase: f64,
    level: f32,
    released: bool,
}

impl Voice {
    fn finished(&self) -> bool {
        self.released && self.level <= 0.0
    }
}

/// Sine-voice engine.
#[derive(Debug, Clone)]
pub struct OscillatorEngine {
    sample_rate: u32,
    max_voices: usize,
    voices: Vec<Voice>,
    /// Pitch bend per channel, in semitones
    bend: [f32; 16],
    volume: [f32; 16],
    attack_step: f32,
    release_step: f32,
}

impl OscillatorEngine {
    pub fn new(sample_rate: u32) -> Self {
        let rate = sample_rate.max(1) as f32;
        Self {
            sample_rate,
            max_voices: RenderSettings::default().max_polyphony,
            voices: Vec::new(),
            bend: [0.0; 16],
            volume: [1.0; 16],
            attack_step: 1.0 / (ATTACK_SECONDS * rate).max(1.0),
            release_step: 1.0 / (RELEASE_SECONDS * rate).max(1.0),
        }
    }

    /// Voices currently sounding, including ones in release.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    fn note_on(&mut self, channel: u8, key: u8, velocity: u8) {
        if self.voices.len() >= self.max_voices {
            // Steal the oldest
            self.voices.remove(0);
        }
        self.voices.push(Voice {
            channel,
            key,
            gain: VOICE_GAIN * velocity as f32 / 127.0,
            phase: 0.0,
            level: 0.0,
            released: false,
        });
    }

    fn note_off(&mut self, channel: u8, key: u8) {
        for voice in &mut self.voices {
            if voice.channel == channel && voice.key == key {
                voice.released = true;
            }
        }
    }

    fn frequency(&self, voice: &Voice) -> f64 {
        let semitones = voice.key as f32 - 69.0 + self.bend[voice.channel as usize & 0x0F];
        440.0 * 2f64.powf(semitones as f64 / 12.0)
    }
}

impl SynthEngine for OscillatorEngine {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn reset(&mut self, settings: &RenderSettings) -> Result<()> {
        self.voices.clear();
        self.bend = [0.0; 16];
        self.volume = [1.0; 16];
        self.max_voices = settings.max_polyphony.max(1);
        Ok(())
    }

    fn apply(&mut self, channel: u8, event: &EventKind) {
        let ch = channel as usize & 0x0F;
        match *event {
            EventKind::NoteOn { key, velocity } if velocity > 0 => self.note_on(channel, key, velocity),
            EventKind::NoteOn { key, .. } | EventKind::NoteOff { key, .. } => self.note_off(channel, key),
            EventKind::PitchBend { .. } => {
                let amount = event.bend_amount().unwrap_or(0) as f32 / 8192.0;
                self.bend[ch] = amount * BEND_RANGE_SEMITONES;
            }
            EventKind::ControlChange { controller, value } => match controller {
                CHANNEL_VOLUME => self.volume[ch] = value as f32 / 127.0,
                ALL_SOUND_OFF => self.voices.retain(|v| v.channel != channel),
                ALL_NOTES_OFF => {
                    for voice in self.voices.iter_mut().filter(|v| v.channel == channel) {
                        voice.released = true;
                    }
                }
                RESET_ALL_CONTROLLERS => {
                    self.bend[ch] = 0.0;
                    self.volume[ch] = 1.0;
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let rate = self.sample_rate.max(1) as f64;
        let increments: Vec<f64> = self.voices.iter().map(|v| self.frequency(v) / rate).collect();

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let mut sum = 0.0f32;
            for (voice, &inc) in self.voices.iter_mut().zip(&increments) {
                if voice.released {
                    voice.level = (voice.level - self.release_step).max(0.0);
                } else {
                    voice.level = (voice.level + self.attack_step).min(1.0);
                }
                let volume = self.volume[voice.channel as usize & 0x0F];
                sum += (voice.phase * core::f64::consts::TAU).sin() as f32 * voice.gain * voice.level * volume;
                voice.phase = (voice.phase + inc).fract();
            }
            *l = sum;
            *r = sum;
        }

        self.voices.retain(|v| !v.finished());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(engine: &mut OscillatorEngine, n: usize) -> Vec<f32> {
        let mut left = vec![0.0; n];
        let mut right = vec![0.0; n];
        engine.render(&mut left, &mut right);
        assert_eq!(left, right);
        left
    }

    fn rising_zero_crossings(samples: &[f32]) -> usize {
        samples.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count()
    }

    #[test]
    fn test_silent_without_notes() {
        let mut engine = OscillatorEngine::new(22050);
        assert!(render(&mut engine, 1024).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_note_pitch() {
        let mut engine = OscillatorEngine::new(22050);
        engine.apply(0, &EventKind::NoteOn { key: 69, velocity: 127 });
        let out = render(&mut engine, 22050);

        // One second of A4
        let crossings = rising_zero_crossings(&out);
        assert!((439..=441).contains(&crossings), "{} crossings", crossings);
        assert!(out.iter().all(|s| s.abs() <= VOICE_GAIN + 1e-6));
    }

    #[test]
    fn test_release_decays_to_silence() {
        let mut engine = OscillatorEngine::new(22050);
        engine.apply(0, &EventKind::NoteOn { key: 60, velocity: 100 });
        render(&mut engine, 2000);
        engine.apply(0, &EventKind::NoteOff { key: 60, velocity: 0 });

        // Release is 50 ms = 1103 samples
        render(&mut engine, 2000);
        assert_eq!(engine.active_voices(), 0);
        assert!(render(&mut engine, 256).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_pitch_bend_raises_frequency() {
        let mut engine = OscillatorEngine::new(22050);
        engine.apply(0, &EventKind::NoteOn { key: 69, velocity: 127 });
        // Full upward bend = +2 semitones, about 493.9 Hz
        engine.apply(0, &EventKind::PitchBend { value: 16383 });
        let crossings = rising_zero_crossings(&render(&mut engine, 22050));
        assert!((492..=495).contains(&crossings), "{} crossings", crossings);
    }

    #[test]
    fn test_polyphony_limit_and_reset() {
        let mut engine = OscillatorEngine::new(22050);
        engine
            .reset(&RenderSettings::default().max_polyphony(8))
            .unwrap();
        for key in 40..60 {
            engine.apply(1, &EventKind::NoteOn { key, velocity: 90 });
        }
        assert_eq!(engine.active_voices(), 8);

        engine.reset(&RenderSettings::default()).unwrap();
        assert_eq!(engine.active_voices(), 0);
    }

    #[test]
    fn test_all_sound_off_is_channel_local() {
        let mut engine = OscillatorEngine::new(22050);
        engine.apply(0, &EventKind::NoteOn { key: 60, velocity: 90 });
        engine.apply(1, &EventKind::NoteOn { key: 64, velocity: 90 });
        engine.apply(
            0,
            &EventKind::ControlChange {
                controller: ALL_SOUND_OFF,
                value: 0,
            },
        );
        assert_eq!(engine.active_voices(), 1);
    }

    #[test]
    fn test_deterministic() {
        let run = || {
            let mut engine = OscillatorEngine::new(16000);
            engine.apply(0, &EventKind::NoteOn { key: 72, velocity: 80 });
            engine.apply(3, &EventKind::NoteOn { key: 55, velocity: 60 });
            render(&mut engine, 4096)
        };
        assert_eq!(run(), run());
    }
}
