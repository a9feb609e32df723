//! SoundFont file loading and caching

use crate::error::{Error, Result};
use dashmap::DashMap;
use rustysynth::SoundFont;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Parse a SoundFont 2 file.
///
/// Missing or unreadable files are `ResourceNotFound`; files that open but
/// do not parse are `Synthesis` errors.
pub fn load_soundfont(path: &Path) -> Result<Arc<SoundFont>> {
    let file = File::open(path).map_err(|source| Error::ResourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = BufReader::new(file);
    let soundfont = SoundFont::new(&mut reader).map_err(|e| {
        Error::Synthesis(format!(
            "Failed to parse SoundFont file '{}': {}",
            path.display(),
            e
        ))
    })?;

    debug!(
        "Loaded SoundFont '{}' ({} presets)",
        path.display(),
        soundfont.get_presets().len()
    );
    Ok(Arc::new(soundfont))
}

/// Shared cache of parsed SoundFonts keyed by path.
///
/// Each bank is parsed once; every caller gets the same read-only
/// `Arc<SoundFont>`, so parallel renderers share sample data.
#[derive(Default)]
pub struct BankLibrary {
    banks: DashMap<PathBuf, Arc<SoundFont>>,
}

impl BankLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a SoundFont or return the cached copy.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<SoundFont>> {
        let key = Self::key(path.as_ref());

        if let Some(entry) = self.banks.get(&key) {
            return Ok(Arc::clone(entry.value()));
        }

        // Parse outside the map lock; a concurrent loader of the same path wins the insert
        let soundfont = load_soundfont(path.as_ref())?;
        Ok(Arc::clone(self.banks.entry(key).or_insert(soundfont).value()))
    }

    /// A bank that has already been loaded.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Arc<SoundFont>> {
        self.banks
            .get(&Self::key(path.as_ref()))
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Paths of every loaded bank.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.banks.iter().map(|entry| entry.key().clone()).collect()
    }

    fn key(path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}
