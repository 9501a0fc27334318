use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use clap::Args;
use colored::Colorize;

use gm_core::Outcome;
use gm_session::config::DEFAULT_MODEL;
use gm_session::{BackendConfig, Session, SessionConfig, Turn};

/// Backend selection. Flags override `GM_*` environment variables.
#[derive(Args, Debug, Default)]
pub struct BackendArgs {
    /// Model passed to `ollama run`, or sent to the HTTP server
    #[arg(short, long)]
    model: Option<String>,

    /// Seconds to wait for one reply
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Run this program per command instead of ollama
    #[arg(long, conflicts_with = "url")]
    program: Option<String>,

    /// Argument for --program (repeatable)
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true, requires = "program")]
    args: Vec<String>,

    /// Base URL of an OpenAI-compatible server
    #[arg(long)]
    url: Option<String>,

    /// Number of past exchanges included in each prompt
    #[arg(short, long)]
    window: Option<usize>,
}

impl BackendArgs {
    fn apply(&self, mut config: SessionConfig) -> SessionConfig {
        let chosen = if let Some(url) = &self.url {
            let model = self
                .model
                .clone()
                .or_else(|| match &config.backend {
                    BackendConfig::Http { model, .. } => Some(model.clone()),
                    BackendConfig::Command { .. } => None,
                })
                .unwrap_or_else(|| DEFAULT_MODEL.to_string());
            Some(BackendConfig::http(url, model))
        } else if let Some(program) = &self.program {
            Some(BackendConfig::command(program, self.args.clone()))
        } else if let Some(model) = &self.model {
            Some(match &config.backend {
                BackendConfig::Http {
                    base_url,
                    temperature,
                    timeout,
                    ..
                } => BackendConfig::Http {
                    base_url: base_url.clone(),
                    model: model.clone(),
                    temperature: *temperature,
                    timeout: *timeout,
                },
                BackendConfig::Command { .. } => BackendConfig::ollama(model),
            })
        } else {
            None
        };

        if let Some(backend) = chosen {
            let timeout = config.backend.timeout();
            config = config.with_backend(backend.with_timeout(timeout));
        }
        if let Some(secs) = self.timeout {
            config.backend = config.backend.with_timeout(Duration::from_secs(secs));
        }
        if let Some(window) = self.window {
            config = config.with_history_window(window);
        }
        config
    }
}

pub fn run(dir: &Path, backend: &BackendArgs) -> Result<(), String> {
    let config = backend.apply(SessionConfig::in_dir(dir).with_env());
    let mut session =
        Session::start(&config).map_err(|e| format!("failed to start session: {e}"))?;

    println!("\n{}\n", session.rules().intro().bold());
    println!("Type 'help' for commands. 'save', 'load', 'inventory', 'quit' available.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        match session.process(&line) {
            Ok(Turn::Ignored) => {}
            Ok(Turn::Info(text)) => println!("{text}\n"),
            Ok(Turn::Narration { text, outcome }) => {
                println!("\n{text}\n");
                if let Some(outcome) = outcome {
                    println!("{}", paint(outcome));
                    break;
                }
            }
            Ok(Turn::Quit) => {
                println!("Goodbye!");
                break;
            }
            Err(e) if e.is_fatal() => return Err(e.to_string()),
            Err(e) => println!("{}\n", e.to_string().yellow()),
        }
    }

    Ok(())
}

fn paint(outcome: Outcome) -> colored::ColoredString {
    let message = outcome.message();
    match outcome {
        Outcome::Win => message.green().bold(),
        Outcome::Lose => message.red().bold(),
        Outcome::TurnLimit => message.yellow().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig::in_dir(Path::new("game"))
    }

    #[test]
    fn no_flags_keep_config() {
        let cfg = BackendArgs::default().apply(config());
        assert_eq!(cfg, config());
    }

    #[test]
    fn model_flag_selects_ollama_model() {
        let args = BackendArgs {
            model: Some("mistral".to_string()),
            ..Default::default()
        };
        assert_eq!(args.apply(config()).backend, BackendConfig::ollama("mistral"));
    }

    #[test]
    fn program_flag_with_timeout() {
        let args = BackendArgs {
            program: Some("sh".to_string()),
            args: vec!["-c".to_string(), "cat".to_string()],
            timeout: Some(3),
            window: Some(1),
            ..Default::default()
        };
        let cfg = args.apply(config());
        assert_eq!(
            cfg.backend,
            BackendConfig::command("sh", vec!["-c".to_string(), "cat".to_string()])
                .with_timeout(Duration::from_secs(3))
        );
        assert_eq!(cfg.history_window, 1);
    }

    #[test]
    fn model_flag_keeps_http_backend_from_env() {
        let base = config().with_vars(|key| {
            (key == "GM_BACKEND_URL").then(|| "http://localhost:1234".to_string())
        });
        let args = BackendArgs {
            model: Some("mistral".to_string()),
            ..Default::default()
        };
        assert_eq!(
            args.apply(base).backend,
            BackendConfig::http("http://localhost:1234", "mistral")
        );
    }

    #[test]
    fn url_flag_keeps_configured_timeout() {
        let args = BackendArgs {
            url: Some("http://localhost:1234".to_string()),
            ..Default::default()
        };
        let base = config().with_backend(
            BackendConfig::default().with_timeout(Duration::from_secs(9)),
        );
        let cfg = args.apply(base);
        assert_eq!(
            cfg.backend,
            BackendConfig::http("http://localhost:1234", DEFAULT_MODEL)
                .with_timeout(Duration::from_secs(9))
        );
    }
}
