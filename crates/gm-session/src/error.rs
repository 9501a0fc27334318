//! Error types for the session engine.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use gm_core::GmError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur during a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Rules, preamble, or prompt could not be loaded or produced.
    #[error("{0}")]
    Core(#[from] GmError),

    /// The backend could not produce a reply.
    #[error("backend failed: {0}")]
    Backend(#[from] BackendError),

    /// A save or transcript file could not be accessed.
    #[error("cannot access {}: {source}", .path.display())]
    Storage {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A save file or transcript line could not be encoded or decoded.
    #[error("bad data in {}: {source}", .path.display())]
    Format {
        /// The file involved.
        path: PathBuf,
        /// The underlying serde error.
        source: serde_json::Error,
    },

    /// The game has already ended.
    #[error("the game is over")]
    Terminated,
}

impl SessionError {
    /// Whether the session cannot continue after this error.
    ///
    /// Only configuration and backend failures end the process; everything
    /// else is reported to the player and play goes on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Core(_) | Self::Backend(_))
    }
}

/// Errors raised by a backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend process could not be started.
    #[error("cannot start '{program}': {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Talking to the backend process failed.
    #[error("backend I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No reply arrived within the time limit.
    #[error("no reply within {}s", .0.as_secs())]
    Timeout(Duration),

    /// The backend process exited unsuccessfully.
    #[error("backend exited with {status}: {stderr}")]
    Failed {
        /// Exit status of the process.
        status: ExitStatus,
        /// What the process wrote to stderr.
        stderr: String,
    },

    /// The HTTP request failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The HTTP reply carried no choices.
    #[error("reply contained no choices")]
    EmptyChoices,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatality() {
        assert!(SessionError::Core(GmError::Rules("x".to_string())).is_fatal());
        assert!(SessionError::Backend(BackendError::Timeout(Duration::from_secs(1))).is_fatal());
        assert!(!SessionError::Terminated.is_fatal());
        assert!(
            !SessionError::Storage {
                path: PathBuf::from("save.json"),
                source: std::io::Error::other("disk full"),
            }
            .is_fatal()
        );
    }

    #[test]
    fn timeout_message() {
        let err = BackendError::Timeout(Duration::from_secs(120));
        assert_eq!(err.to_string(), "no reply within 120s");
    }
}
