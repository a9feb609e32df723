//! Decibel scaling referenced to the loudest value in a map.

/// What the values being converted represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Squared magnitude; `10 * log10`.
    Power,
    /// Magnitude; `20 * log10`.
    Amplitude,
}

impl Scale {
    /// Smallest value distinguished from silence.
    pub fn floor(self) -> f64 {
        match self {
            Scale::Power => 1e-10,
            Scale::Amplitude => 1e-5,
        }
    }

    fn multiplier(self) -> f64 {
        match self {
            Scale::Power => 10.0,
            Scale::Amplitude => 20.0,
        }
    }
}

/// Convert `values` to dB in place, relative to their maximum.
///
/// The loudest value maps to 0 dB and everything is clamped to
/// `[-top_db, 0]`. When every value is below the scale's floor the
/// reference is the floor itself, so silence comes out as all zeros.
pub fn to_db(values: &mut [f32], scale: Scale, top_db: f32) {
    let floor = scale.floor();
    let mult = scale.multiplier();

    let peak = values.iter().fold(0.0f64, |acc, &v| acc.max(v as f64));
    let reference = mult * peak.max(floor).log10();
    let lowest = -(top_db as f64);

    for v in values.iter_mut() {
        let db = mult * (*v as f64).max(floor).log10() - reference;
        *v = db.clamp(lowest, 0.0) as f32;
    }
}
