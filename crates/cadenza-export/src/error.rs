//! Error types for cadenza-export

use std::io;
use thiserror::Error;

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported format or extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Malformed or unexpected file contents
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

impl From<hound::Error> for ExportError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(io) => ExportError::Io(io),
            other => ExportError::Encoding(other.to_string()),
        }
    }
}

impl From<ndarray_npy::WriteNpyError> for ExportError {
    fn from(e: ndarray_npy::WriteNpyError) -> Self {
        match e {
            ndarray_npy::WriteNpyError::Io(err) => ExportError::Io(err),
            other => ExportError::Encoding(other.to_string()),
        }
    }
}

impl From<ndarray_npy::ReadNpyError> for ExportError {
    fn from(e: ndarray_npy::ReadNpyError) -> Self {
        match e {
            // EOF mid-array is a truncated file
            ndarray_npy::ReadNpyError::Io(err) if err.kind() != io::ErrorKind::UnexpectedEof => ExportError::Io(err),
            other => ExportError::InvalidData(other.to_string()),
        }
    }
}

impl From<tempfile::PersistError> for ExportError {
    fn from(e: tempfile::PersistError) -> Self {
        ExportError::Io(e.error)
    }
}

impl From<cadenza_core::Error> for ExportError {
    fn from(e: cadenza_core::Error) -> Self {
        ExportError::InvalidData(e.to_string())
    }
}
