//! Tick to seconds conversion.

use crate::score::ScoreTiming;

/// Default tempo when a file has none: 120 BPM.
pub const DEFAULT_MICROS_PER_BEAT: u32 = 500_000;

/// A tempo meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempoChange {
    /// Absolute tick of the change
    pub tick: u64,
    /// Microseconds per quarter note
    pub micros_per_beat: u32,
}

impl TempoChange {
    pub fn bpm(&self) -> f64 {
        60_000_000.0 / self.micros_per_beat as f64
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment {
    tick: u64,
    start_seconds: f64,
    micros_per_beat: u32,
}

/// Piecewise-linear mapping from ticks to seconds.
#[derive(Debug, Clone)]
pub(crate) enum TempoMap {
    Metrical {
        ticks_per_beat: f64,
        segments: Vec<Segment>,
    },
    Timecode {
        ticks_per_second: f64,
    },
}

impl TempoMap {
    /// `changes` must be sorted by tick.
    pub(crate) fn new(timing: ScoreTiming, changes: &[TempoChange]) -> Self {
        match timing {
            ScoreTiming::Timecode {
                frames_per_second,
                subframes,
            } => TempoMap::Timecode {
                ticks_per_second: frames_per_second as f64 * subframes as f64,
            },
            ScoreTiming::Metrical { ticks_per_beat } => {
                let ticks_per_beat = ticks_per_beat as f64;
                let mut segments = vec![Segment {
                    tick: 0,
                    start_seconds: 0.0,
                    micros_per_beat: DEFAULT_MICROS_PER_BEAT,
                }];

                for change in changes {
                    let last = segments[segments.len() - 1];
                    if change.tick == last.tick {
                        // Later event at the same tick wins
                        let end = segments.len() - 1;
                        segments[end].micros_per_beat = change.micros_per_beat;
                        continue;
                    }
                    segments.push(Segment {
                        tick: change.tick,
                        start_seconds: last.start_seconds
                            + ticks_to_seconds(
                                change.tick - last.tick,
                                last.micros_per_beat,
                                ticks_per_beat,
                            ),
                        micros_per_beat: change.micros_per_beat,
                    });
                }

                TempoMap::Metrical {
                    ticks_per_beat,
                    segments,
                }
            }
        }
    }

    pub(crate) fn seconds_at(&self, tick: u64) -> f64 {
        match self {
            TempoMap::Timecode { ticks_per_second } => tick as f64 / ticks_per_second,
            TempoMap::Metrical {
                ticks_per_beat,
                segments,
            } => {
                let idx = segments.partition_point(|s| s.tick <= tick).saturating_sub(1);
                let seg = segments[idx];
                seg.start_seconds
                    + ticks_to_seconds(tick - seg.tick, seg.micros_per_beat, *ticks_per_beat)
            }
        }
    }
}

fn ticks_to_seconds(ticks: u64, micros_per_beat: u32, ticks_per_beat: f64) -> f64 {
    (ticks as f64 * micros_per_beat as f64) / (ticks_per_beat * 1_000_000.0)
}
