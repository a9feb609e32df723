//! Centralized error type for the cadenza umbrella crate.
//!
//! Wraps each stage's error so `?` propagates across crate boundaries while
//! [`Error::kind`] still reports what went wrong.

use thiserror::Error;

/// What went wrong, independent of the stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Score or sample bank missing or unreadable
    ResourceNotFound,
    /// Score (or stored feature file) is malformed
    InputParse,
    /// Synthesis engine cannot render the score
    Synthesis,
    /// Waveform is empty, non-finite or at the wrong sample rate
    InvalidInput,
    /// Configuration rejected
    InvalidConfig,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config: {0}")]
    Config(#[from] cadenza_core::Error),

    #[error("Render: {0}")]
    Render(#[from] cadenza_synth::Error),

    #[error("Analysis: {0}")]
    Analysis(#[from] cadenza_analysis::Error),

    #[error("Export: {0}")]
    Export(#[from] cadenza_export::ExportError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(cadenza_core::Error::InvalidConfig(_)) => ErrorKind::InvalidConfig,
            Error::Config(cadenza_core::Error::ShapeMismatch { .. }) => ErrorKind::InvalidInput,
            Error::Render(cadenza_synth::Error::ResourceNotFound { .. }) => ErrorKind::ResourceNotFound,
            Error::Render(cadenza_synth::Error::InputParse(_)) => ErrorKind::InputParse,
            Error::Render(cadenza_synth::Error::Synthesis(_)) => ErrorKind::Synthesis,
            Error::Analysis(_) => ErrorKind::InvalidInput,
            Error::Export(cadenza_export::ExportError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                ErrorKind::ResourceNotFound
            }
            Error::Export(_) => ErrorKind::InputParse,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
