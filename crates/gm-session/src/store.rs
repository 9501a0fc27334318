//! The single save slot.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use gm_core::GameState;

use crate::error::{SessionError, SessionResult};

/// Reads and writes the game state as pretty-printed JSON.
///
/// Saves go to a sibling temporary file first and are renamed into place,
/// so an interrupted save leaves the previous one intact.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    /// A store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The save file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a save file is present.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Overwrite the save with `state`.
    pub fn save(&self, state: &GameState) -> SessionResult<()> {
        let json = serde_json::to_string_pretty(state).map_err(|source| SessionError::Format {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.storage(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.storage(e))?;

        tracing::debug!(path = %self.path.display(), "game saved");
        Ok(())
    }

    /// Read the saved state, or `None` when there is no save.
    pub fn load(&self) -> SessionResult<Option<GameState>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.storage(e)),
        };
        let state = serde_json::from_str(&text).map_err(|source| SessionError::Format {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(state))
    }

    fn storage(&self, source: std::io::Error) -> SessionError {
        SessionError::Storage {
            path: self.path.clone(),
            source,
        }
    }
}
