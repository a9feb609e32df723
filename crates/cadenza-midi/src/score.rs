//! Standard MIDI File parsing
//!
//! Converts an SMF into a flat, time-ordered list of channel events with
//! absolute timestamps in seconds, ready for sample-accurate rendering.
//! Parsing is done with the `midly` crate.

use crate::error::{Error, Result};
use crate::tempo::{TempoChange, TempoMap};
use midly::{MetaMessage, MidiMessage, Smf, Timing, Track, TrackEventKind};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use tracing::debug;

/// General MIDI percussion channel (channel 10, zero-based 9).
pub const PERCUSSION_CHANNEL: u8 = 9;

/// Time base of the source file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreTiming {
    /// Ticks per quarter note; wall-clock time depends on the tempo map.
    Metrical { ticks_per_beat: u16 },
    /// SMPTE timecode: ticks are `1 / (frames_per_second * subframes)` seconds.
    Timecode { frames_per_second: f32, subframes: u8 },
}

/// Channel events we render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn { key: u8, velocity: u8 },
    NoteOff { key: u8, velocity: u8 },
    ControlChange { controller: u8, value: u8 },
    ProgramChange { program: u8 },
    /// Raw 14-bit value, centre = 8192
    PitchBend { value: u16 },
    ChannelPressure { pressure: u8 },
    KeyPressure { key: u8, pressure: u8 },
}

impl EventKind {
    /// Status nibble and data bytes as they appear on the wire.
    pub fn to_message(self) -> (u8, u8, u8) {
        match self {
            EventKind::NoteOff { key, velocity } => (0x80, key, velocity),
            EventKind::NoteOn { key, velocity } => (0x90, key, velocity),
            EventKind::KeyPressure { key, pressure } => (0xA0, key, pressure),
            EventKind::ControlChange { controller, value } => (0xB0, controller, value),
            EventKind::ProgramChange { program } => (0xC0, program, 0),
            EventKind::ChannelPressure { pressure } => (0xD0, pressure, 0),
            EventKind::PitchBend { value } => {
                (0xE0, (value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8)
            }
        }
    }

    /// Signed pitch bend (-8192..=8191), if this is a bend.
    pub fn bend_amount(self) -> Option<i16> {
        match self {
            EventKind::PitchBend { value } => Some(value as i16 - 8192),
            _ => None,
        }
    }
}

/// A channel event with an absolute timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEvent {
    /// Seconds from the start of the file
    pub time_seconds: f64,
    /// Absolute tick position in the source file
    pub tick: u64,
    /// Index of the track the event came from
    pub track: usize,
    /// MIDI channel (0-15)
    pub channel: u8,
    pub kind: EventKind,
}

/// A sounding note reconstructed from a note-on / note-off pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub track: usize,
    pub channel: u8,
    /// Program active on the channel when the note started
    pub program: u8,
    pub key: u8,
    pub velocity: u8,
    pub onset: f64,
    pub duration: f64,
}

impl Note {
    pub fn end(&self) -> f64 {
        self.onset + self.duration
    }
}

/// A parsed MIDI file.
#[derive(Debug, Clone)]
pub struct Score {
    events: Vec<ScoreEvent>,
    timing: ScoreTiming,
    tempo_changes: Vec<TempoChange>,
    track_names: Vec<Option<String>>,
    duration_seconds: f64,
}

impl Score {
    /// Load and parse a MIDI file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| Error::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data)
    }

    /// Parse a MIDI file from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let smf = Smf::parse(data)?;

        let timing = match smf.header.timing {
            Timing::Metrical(tpb) => {
                let ticks_per_beat = tpb.as_int();
                if ticks_per_beat == 0 {
                    return Err(Error::MidiFileParse(
                        "ticks per beat must be non-zero".into(),
                    ));
                }
                ScoreTiming::Metrical { ticks_per_beat }
            }
            Timing::Timecode(fps, subframes) => {
                if subframes == 0 {
                    return Err(Error::MidiFileParse(
                        "timecode subframes must be non-zero".into(),
                    ));
                }
                ScoreTiming::Timecode {
                    frames_per_second: fps.as_f32(),
                    subframes,
                }
            }
        };

        debug!(
            "Parsing MIDI file: {} tracks, timing {:?}",
            smf.tracks.len(),
            timing
        );

        let mut raw = Vec::new();
        let mut tempo_changes = Vec::new();
        let mut track_names = Vec::with_capacity(smf.tracks.len());

        for (index, track) in smf.tracks.iter().enumerate() {
            track_names.push(Self::parse_track(
                track,
                index,
                &mut raw,
                &mut tempo_changes,
            )?);
        }

        // Stable: equal ticks keep track order, then file order
        raw.sort_by_key(|e: &RawEvent| e.tick);
        tempo_changes.sort_by_key(|t: &TempoChange| t.tick);

        let tempo_map = TempoMap::new(timing, &tempo_changes);

        let events: Vec<ScoreEvent> = raw
            .into_iter()
            .map(|e| ScoreEvent {
                time_seconds: tempo_map.seconds_at(e.tick),
                tick: e.tick,
                track: e.track,
                channel: e.channel,
                kind: e.kind,
            })
            .collect();

        let duration_seconds = events.last().map(|e| e.time_seconds).unwrap_or(0.0);

        debug!(
            "Parsed {} MIDI events, duration: {:.3} s",
            events.len(),
            duration_seconds
        );

        Ok(Self {
            events,
            timing,
            tempo_changes,
            track_names,
            duration_seconds,
        })
    }

    /// Collect one track's channel events and tempo changes; returns its name.
    fn parse_track(
        track: &Track,
        index: usize,
        raw: &mut Vec<RawEvent>,
        tempo_changes: &mut Vec<TempoChange>,
    ) -> Result<Option<String>> {
        let mut tick = 0u64;
        let mut name = None;

        for event in track.iter() {
            tick += event.delta.as_int() as u64;

            match &event.kind {
                TrackEventKind::Midi { channel, message } => {
                    if let Some(kind) = Self::convert_message(message) {
                        raw.push(RawEvent {
                            tick,
                            track: index,
                            channel: channel.as_int(),
                            kind,
                        });
                    }
                }
                TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => {
                    let micros_per_beat = tempo.as_int();
                    if micros_per_beat == 0 {
                        return Err(Error::InvalidTempo(micros_per_beat));
                    }
                    tempo_changes.push(TempoChange {
                        tick,
                        micros_per_beat,
                    });
                }
                TrackEventKind::Meta(MetaMessage::TrackName(bytes)) if name.is_none() => {
                    name = Some(String::from_utf8_lossy(bytes).into_owned());
                }
                // Sysex, escapes and other meta events do not affect rendering
                _ => {}
            }
        }

        Ok(name)
    }

    fn convert_message(message: &MidiMessage) -> Option<EventKind> {
        let kind = match message {
            MidiMessage::NoteOn { key, vel } => {
                // Velocity 0 is a note off
                if vel.as_int() == 0 {
                    EventKind::NoteOff {
                        key: key.as_int(),
                        velocity: 0,
                    }
                } else {
                    EventKind::NoteOn {
                        key: key.as_int(),
                        velocity: vel.as_int(),
                    }
                }
            }
            MidiMessage::NoteOff { key, vel } => EventKind::NoteOff {
                key: key.as_int(),
                velocity: vel.as_int(),
            },
            MidiMessage::Controller { controller, value } => EventKind::ControlChange {
                controller: controller.as_int(),
                value: value.as_int(),
            },
            MidiMessage::ProgramChange { program } => EventKind::ProgramChange {
                program: program.as_int(),
            },
            MidiMessage::PitchBend { bend } => EventKind::PitchBend {
                value: bend.0.as_int(),
            },
            MidiMessage::ChannelAftertouch { vel } => EventKind::ChannelPressure {
                pressure: vel.as_int(),
            },
            MidiMessage::Aftertouch { key, vel } => EventKind::KeyPressure {
                key: key.as_int(),
                pressure: vel.as_int(),
            },
        };
        Some(kind)
    }

    /// All channel events, sorted by time.
    pub fn events(&self) -> &[ScoreEvent] {
        &self.events
    }

    pub fn timing(&self) -> ScoreTiming {
        self.timing
    }

    /// Tempo changes in tick order (empty means the 120 BPM default).
    pub fn tempo_changes(&self) -> &[TempoChange] {
        &self.tempo_changes
    }

    pub fn track_count(&self) -> usize {
        self.track_names.len()
    }

    pub fn track_name(&self, track: usize) -> Option<&str> {
        self.track_names.get(track).and_then(|n| n.as_deref())
    }

    /// Time of the last channel event in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events with `start <= time < end`.
    pub fn events_between(&self, start_seconds: f64, end_seconds: f64) -> &[ScoreEvent] {
        let start = self
            .events
            .partition_point(|e| e.time_seconds < start_seconds);
        let end = self.events.partition_point(|e| e.time_seconds < end_seconds);
        &self.events[start..end.max(start)]
    }

    /// Pair note-ons with note-offs.
    ///
    /// Overlapping notes on the same channel and key are matched first-in
    /// first-out. Notes still held at the end of the file are closed at
    /// [`duration_seconds`](Self::duration_seconds).
    pub fn notes(&self) -> Vec<Note> {
        let mut programs = [0u8; 16];
        let mut open: HashMap<(u8, u8), VecDeque<(f64, u8, usize, u8)>> = HashMap::new();
        let mut notes = Vec::new();

        for event in &self.events {
            let channel = event.channel;
            match event.kind {
                EventKind::ProgramChange { program } => {
                    programs[channel as usize & 0x0F] = program;
                }
                EventKind::NoteOn { key, velocity } => {
                    open.entry((channel, key)).or_default().push_back((
                        event.time_seconds,
                        velocity,
                        event.track,
                        programs[channel as usize & 0x0F],
                    ));
                }
                EventKind::NoteOff { key, .. } => {
                    if let Some((onset, velocity, track, program)) =
                        open.get_mut(&(channel, key)).and_then(|q| q.pop_front())
                    {
                        notes.push(Note {
                            track,
                            channel,
                            program,
                            key,
                            velocity,
                            onset,
                            duration: event.time_seconds - onset,
                        });
                    }
                }
                _ => {}
            }
        }

        for ((channel, key), queue) in open {
            for (onset, velocity, track, program) in queue {
                notes.push(Note {
                    track,
                    channel,
                    program,
                    key,
                    velocity,
                    onset,
                    duration: self.duration_seconds - onset,
                });
            }
        }

        notes.sort_by(|a, b| {
            a.onset
                .total_cmp(&b.onset)
                .then(a.channel.cmp(&b.channel))
                .then(a.key.cmp(&b.key))
        });
        notes
    }
}

struct RawEvent {
    tick: u64,
    track: usize,
    channel: u8,
    kind: EventKind,
}
