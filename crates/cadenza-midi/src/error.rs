//! Error types for score parsing.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Score file not found or unreadable: '{path}': {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("MIDI parse error: {0}")]
    MidiFileParse(String),

    #[error("Invalid tempo: {0} microseconds per quarter note")]
    InvalidTempo(u32),
}

impl From<midly::Error> for Error {
    fn from(e: midly::Error) -> Self {
        Error::MidiFileParse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
