use std::path::PathBuf;

/// Alias for `Result<T, GmError>`.
pub type GmResult<T> = Result<T, GmError>;

/// Errors raised while loading or serializing game data.
#[derive(Debug, thiserror::Error)]
pub enum GmError {
    /// A game file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("invalid {what}: {source}")]
    Json {
        /// What was being (de)serialized, e.g. "rules file".
        what: String,
        /// The underlying serde error.
        source: serde_json::Error,
    },

    /// The rules document is well-formed JSON but not usable.
    #[error("invalid rules: {0}")]
    Rules(String),
}
