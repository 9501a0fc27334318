//! Configuration for a game session.
//!
//! Defaults describe the standard game directory layout and a local
//! `ollama` backend. [`SessionConfig::with_env`] overlays environment
//! variables; explicit builder calls made afterwards win.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama3.1:8b";
/// Number of history entries shown to the backend.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;
/// How long one backend call may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Sampling temperature for HTTP backends.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Rules file, relative to the game directory.
pub const RULES_FILE: &str = "rules.json";
/// Preamble file, relative to the game directory.
pub const PREAMBLE_FILE: &str = "prompts/gm.txt";
/// Save file, relative to the game directory.
pub const SAVE_FILE: &str = "save.json";
/// Transcript file, relative to the game directory.
pub const TRANSCRIPT_FILE: &str = "samples/transcript.jsonl";

/// Where game files live and how to reach the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Rules file.
    pub rules_path: PathBuf,
    /// Fixed instruction preamble placed at the top of every prompt.
    pub preamble_path: PathBuf,
    /// Save file written by `save` and read by `load`.
    pub save_path: PathBuf,
    /// Append-only transcript.
    pub transcript_path: PathBuf,
    /// Number of recent exchanges included in each prompt.
    pub history_window: usize,
    /// Backend settings.
    pub backend: BackendConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

impl SessionConfig {
    /// The standard layout rooted at `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            rules_path: dir.join(RULES_FILE),
            preamble_path: dir.join(PREAMBLE_FILE),
            save_path: dir.join(SAVE_FILE),
            transcript_path: dir.join(TRANSCRIPT_FILE),
            history_window: DEFAULT_HISTORY_WINDOW,
            backend: BackendConfig::default(),
        }
    }

    /// Overlay settings from the process environment.
    ///
    /// - `GM_BACKEND_URL` - switch to an HTTP backend at this base URL
    /// - `GM_MODEL` - model name
    /// - `GM_TIMEOUT_SECS` - backend time limit in seconds
    /// - `GM_HISTORY_WINDOW` - history entries per prompt
    pub fn with_env(self) -> Self {
        self.with_vars(|key| env::var(key).ok())
    }

    /// Overlay settings from any variable lookup.
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let model = lookup("GM_MODEL");
        if let Some(url) = lookup("GM_BACKEND_URL") {
            let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
            self.backend = BackendConfig::http(url, model);
        } else if let Some(model) = model {
            self.backend = BackendConfig::ollama(&model);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "GM_TIMEOUT_SECS") {
            self.backend = self.backend.with_timeout(Duration::from_secs(secs));
        }
        if let Some(window) = parse_var::<usize>(&lookup, "GM_HISTORY_WINDOW") {
            self.history_window = window;
        }
        self
    }

    /// Set the history window.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Set the backend.
    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = backend;
        self
    }
}

/// How to reach the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    /// Run a program per command, prompt on stdin, reply on stdout.
    Command {
        /// Program to run.
        program: String,
        /// Arguments passed to the program.
        args: Vec<String>,
        /// Time limit for one call.
        timeout: Duration,
    },
    /// POST to an OpenAI-compatible chat completions endpoint.
    Http {
        /// Server base URL, e.g. `http://localhost:1234`.
        base_url: String,
        /// Model name sent with each request.
        model: String,
        /// Sampling temperature.
        temperature: f32,
        /// Time limit for one call.
        timeout: Duration,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::ollama(DEFAULT_MODEL)
    }
}

impl BackendConfig {
    /// `ollama run <model>`.
    pub fn ollama(model: &str) -> Self {
        Self::command("ollama", vec!["run".to_string(), model.to_string()])
    }

    /// An arbitrary program.
    pub fn command(program: impl Into<String>, args: Vec<String>) -> Self {
        Self::Command {
            program: program.into(),
            args,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// An HTTP chat completions server.
    pub fn http(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self::Http {
            base_url: base_url.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the time limit.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        match &mut self {
            Self::Command { timeout, .. } | Self::Http { timeout, .. } => *timeout = limit,
        }
        self
    }

    /// The time limit for one call.
    pub fn timeout(&self) -> Duration {
        match self {
            Self::Command { timeout, .. } | Self::Http { timeout, .. } => *timeout,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
