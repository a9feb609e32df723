//! Tolerance constants for pipeline tests.

/// Floating point rounding errors (exact gain, downmix of identical channels).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Values stored as `<f4` and read back are bit-exact; dB math done in
/// f64 and cast to f32 lands within this of the analytic value.
pub const DB_EPSILON: f32 = 1e-3;

/// Silence threshold (~-80dB).
/// Values below this are considered silent.
pub const SILENCE_THRESHOLD: f32 = 0.0001;

/// 16-bit quantization step size.
/// Use when comparing a waveform with its 16-bit WAV.
pub const INT16_EPSILON: f32 = 1.0 / 32768.0;

/// Minimum RMS for "this render produced sound".
pub const AUDIBLE_RMS: f32 = 0.01;
