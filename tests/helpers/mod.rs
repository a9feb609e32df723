//! Test helpers and fixtures for cadenza integration tests
//!
//! MIDI fixtures are written with `midly` into a scratch directory, so no
//! binary test data is checked in. SoundFont-backed tests need
//! `assets/soundfonts/TimGM6mb.sf2` and skip when it is missing.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations
//! - `DB_EPSILON` (1e-3): dB values
//! - `INT16_EPSILON`: 16-bit WAV round trips
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

#![allow(dead_code)]

pub mod tolerances;

use cadenza::prelude::*;
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::{Path, PathBuf};

/// Ticks per quarter note in generated fixtures.
pub const TICKS_PER_BEAT: u16 = 480;

/// Ticks per second at the default 120 BPM.
pub const TICKS_PER_SECOND: u32 = 960;

/// Bundled General MIDI bank, if present.
pub fn soundfont_path() -> Option<PathBuf> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/soundfonts/TimGM6mb.sf2");
    if path.exists() {
        Some(path)
    } else {
        eprintln!("Skipping test: SoundFont not found at {:?}", path);
        None
    }
}

/// Pipeline over the oscillator engine (no sample bank needed).
pub fn oscillator_pipeline(config: AudioConfig) -> FeaturePipeline {
    FeaturePipeline::from_parts(MidiRenderer::oscillator(config.sample_rate()), config)
        .expect("Failed to create test pipeline")
}

/// One note in a fixture, in ticks.
#[derive(Debug, Clone, Copy)]
pub struct FixtureNote {
    pub channel: u8,
    pub key: u8,
    pub velocity: u8,
    pub start: u32,
    pub length: u32,
}

impl FixtureNote {
    pub fn new(channel: u8, key: u8, start: u32, length: u32) -> Self {
        Self {
            channel,
            key,
            velocity: 100,
            start,
            length,
        }
    }
}

/// Builds small Standard MIDI Files.
#[derive(Debug, Clone, Default)]
pub struct ScoreBuilder {
    notes: Vec<FixtureNote>,
    programs: Vec<(u32, u8, u8)>,
    tempos: Vec<(u32, u32)>,
}

impl ScoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(mut self, note: FixtureNote) -> Self {
        self.notes.push(note);
        self
    }

    /// `(tick, channel, program)`
    pub fn program(mut self, tick: u32, channel: u8, program: u8) -> Self {
        self.programs.push((tick, channel, program));
        self
    }

    /// `(tick, microseconds per quarter note)`
    pub fn tempo(mut self, tick: u32, micros_per_beat: u32) -> Self {
        self.tempos.push((tick, micros_per_beat));
        self
    }

    /// Encode as a format 0 file.
    pub fn to_bytes(&self) -> Vec<u8> {
        // (absolute tick, order within tick, kind)
        let mut events: Vec<(u32, u8, TrackEventKind<'static>)> = Vec::new();

        for &(tick, micros) in &self.tempos {
            events.push((tick, 0, TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros)))));
        }
        for &(tick, channel, program) in &self.programs {
            events.push((
                tick,
                1,
                TrackEventKind::Midi {
                    channel: u4::new(channel),
                    message: MidiMessage::ProgramChange {
                        program: u7::new(program),
                    },
                },
            ));
        }
        for note in &self.notes {
            events.push((
                note.start + note.length,
                2,
                TrackEventKind::Midi {
                    channel: u4::new(note.channel),
                    message: MidiMessage::NoteOff {
                        key: u7::new(note.key),
                        vel: u7::new(0),
                    },
                },
            ));
            events.push((
                note.start,
                3,
                TrackEventKind::Midi {
                    channel: u4::new(note.channel),
                    message: MidiMessage::NoteOn {
                        key: u7::new(note.key),
                        vel: u7::new(note.velocity),
                    },
                },
            ));
        }
        events.sort_by_key(|(tick, order, _)| (*tick, *order));

        let mut track = Vec::with_capacity(events.len() + 1);
        let mut last = 0;
        for (tick, _, kind) in events {
            track.push(TrackEvent {
                delta: u28::new(tick - last),
                kind,
            });
            last = tick;
        }
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });

        let smf = Smf {
            header: Header::new(Format::SingleTrack, Timing::Metrical(u15::new(TICKS_PER_BEAT))),
            tracks: vec![track],
        };
        let mut bytes = Vec::new();
        smf.write_std(&mut bytes).expect("Failed to encode MIDI fixture");
        bytes
    }

    pub fn write(&self, path: &Path) -> PathBuf {
        std::fs::write(path, self.to_bytes()).expect("Failed to write MIDI fixture");
        path.to_path_buf()
    }
}

/// C major triad held for exactly three seconds at 120 BPM.
pub fn three_second_chord(dir: &Path) -> PathBuf {
    let length = 3 * TICKS_PER_SECOND;
    ScoreBuilder::new()
        .note(FixtureNote::new(0, 60, 0, length))
        .note(FixtureNote::new(0, 64, 0, length))
        .note(FixtureNote::new(0, 67, 0, length))
        .write(&dir.join("chord.mid"))
}

/// Short melody of `count` quarter notes starting at `key`.
pub fn scale_fixture(dir: &Path, name: &str, key: u8, count: u8) -> PathBuf {
    let beat = TICKS_PER_BEAT as u32;
    (0..count)
        .fold(ScoreBuilder::new(), |b, i| {
            b.note(FixtureNote::new(0, key + i, i as u32 * beat, beat))
        })
        .write(&dir.join(name))
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Assert that a signal has content (not silent).
pub fn assert_has_audio(samples: &[f32], min_rms: f32) {
    let r = rms(samples);
    assert!(
        r >= min_rms,
        "Expected audio content with RMS >= {}, but RMS was {}",
        min_rms,
        r
    );
}

/// Assert every value lies in `[lo, hi]`.
pub fn assert_in_range(map: &SpectralMap, lo: f32, hi: f32) {
    let stats = map.stats().expect("empty map");
    assert!(
        stats.min >= lo && stats.max <= hi,
        "values span [{}, {}], expected within [{}, {}]",
        stats.min,
        stats.max,
        lo,
        hi
    );
}
