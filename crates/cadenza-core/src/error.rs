//! Error types for cadenza-core.

use thiserror::Error;

/// Error type for cadenza-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Shape mismatch: {bins} x {frames} map needs {expected} values, got {actual}")]
    ShapeMismatch {
        bins: usize,
        frames: usize,
        expected: usize,
        actual: usize,
    },
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
