//! Error types for cadenza-synth.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cadenza-synth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading banks or rendering scores.
#[derive(Debug, Error)]
pub enum Error {
    /// Sample bank or score missing or unreadable.
    #[error("Resource not found: '{}': {source}", path.display())]
    ResourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Score file is not a valid Standard MIDI File.
    #[error("Score parse error: {0}")]
    InputParse(String),

    /// Bank or engine cannot produce the requested audio.
    #[error("Synthesis error: {0}")]
    Synthesis(String),
}

impl From<cadenza_midi::Error> for Error {
    fn from(e: cadenza_midi::Error) -> Self {
        match e {
            cadenza_midi::Error::NotFound { path, source } => Error::ResourceNotFound { path, source },
            other => Error::InputParse(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_errors_map_to_kinds() {
        let missing = cadenza_midi::Error::NotFound {
            path: "song.mid".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(matches!(Error::from(missing), Error::ResourceNotFound { .. }));

        let bad = cadenza_midi::Error::MidiFileParse("truncated header".into());
        match Error::from(bad) {
            Error::InputParse(msg) => assert!(msg.contains("truncated header")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
