//! Error types for cadenza-analysis.

use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Rejected analysis input. Every variant is an invalid-input condition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid input: waveform is empty")]
    EmptyInput,

    #[error("Invalid input: non-finite sample {value} at index {index}")]
    NonFiniteSample { index: usize, value: f32 },

    #[error("Invalid input: waveform is {actual} Hz but the processor expects {expected} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },
}
