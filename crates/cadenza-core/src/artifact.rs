//! Non-fatal failures while persisting optional side artifacts.

use std::fmt;
use std::path::PathBuf;

/// Which optional output failed to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Rendered waveform (`.wav`)
    Waveform,
    /// Feature array (`.npy`)
    Features,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Waveform => f.write_str("waveform"),
            ArtifactKind::Features => f.write_str("feature map"),
        }
    }
}

/// A side artifact could not be written. The in-memory result is still valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactWarning {
    pub artifact: ArtifactKind,
    pub path: PathBuf,
    pub message: String,
}

impl ArtifactWarning {
    pub fn new(artifact: ArtifactKind, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            artifact,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ArtifactWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to write {} to '{}': {}",
            self.artifact,
            self.path.display(),
            self.message
        )
    }
}
