//! Backends that turn a prompt into game master text.
//!
//! The backend is opaque: text in, text out. Failures are fatal to the
//! session, so implementations report them rather than retrying.

pub mod command;
pub mod http;

pub use command::CommandBackend;
pub use http::HttpBackend;

use crate::config::BackendConfig;
use crate::error::BackendResult;

/// A text-in, text-out game master.
pub trait Backend {
    /// Short description for logs and banners.
    fn name(&self) -> &str;

    /// Send one prompt and wait for the reply text.
    fn complete(&mut self, prompt: &str) -> BackendResult<String>;
}

/// Build the backend described by `config`.
pub fn connect(config: &BackendConfig) -> BackendResult<Box<dyn Backend>> {
    match config {
        BackendConfig::Command {
            program,
            args,
            timeout,
        } => Ok(Box::new(CommandBackend::new(program, args.clone(), *timeout))),
        BackendConfig::Http {
            base_url,
            model,
            temperature,
            timeout,
        } => Ok(Box::new(HttpBackend::new(
            base_url,
            model,
            *temperature,
            *timeout,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_command_backend() {
        let backend = connect(&BackendConfig::ollama("mistral")).unwrap();
        assert_eq!(backend.name(), "ollama run mistral");
    }

    #[test]
    fn connect_http_backend() {
        let backend = connect(&BackendConfig::http("http://localhost:1234/", "local")).unwrap();
        assert_eq!(backend.name(), "http://localhost:1234/v1/chat/completions (local)");
    }
}
