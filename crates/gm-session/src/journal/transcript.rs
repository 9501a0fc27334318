//! Append-only JSON Lines record of every resolved exchange.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use gm_core::TranscriptEntry;

use crate::error::{SessionError, SessionResult};

/// A transcript file. The file is opened for each append and closed again.
#[derive(Debug, Clone)]
pub struct Transcript {
    path: PathBuf,
}

impl Transcript {
    /// A transcript at `path`. Nothing is created until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where lines are written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one entry as a single line.
    pub fn append(&self, entry: &TranscriptEntry<'_>) -> SessionResult<()> {
        let mut line = serde_json::to_string(entry).map_err(|source| SessionError::Format {
            path: self.path.clone(),
            source,
        })?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.storage(e))?;
        file.write_all(line.as_bytes()).map_err(|e| self.storage(e))
    }

    fn storage(&self, source: std::io::Error) -> SessionError {
        SessionError::Storage {
            path: self.path.clone(),
            source,
        }
    }
}
