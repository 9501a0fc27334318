//! A backend that runs a local program per prompt.
//!
//! The prompt is written to the child's stdin and the reply read from its
//! stdout. Pipes are drained on helper threads so a chatty child cannot
//! block. The child is killed once the time limit passes, and output still
//! held open by anything it left running is abandoned at the same limit.

use std::io::{self, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use super::Backend;
use crate::error::{BackendError, BackendResult};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs a program such as `ollama run <model>` for every prompt.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    label: String,
}

impl CommandBackend {
    /// Create a backend for `program` with fixed arguments.
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        let program = program.into();
        let label = std::iter::once(program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            program,
            args,
            timeout,
            label,
        }
    }

    fn collect<T>(&self, rx: Receiver<io::Result<T>>, deadline: Instant) -> BackendResult<T> {
        let left = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(left) {
            Ok(result) => result.map_err(BackendError::from),
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(backend = %self.label, "backend output still open at the deadline");
                Err(BackendError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(io::Error::other("backend pipe thread panicked").into())
            }
        }
    }

    fn spawn(&self) -> BackendResult<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })
    }
}

impl Backend for CommandBackend {
    fn name(&self) -> &str {
        &self.label
    }

    fn complete(&mut self, prompt: &str) -> BackendResult<String> {
        let mut child = self.spawn()?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_owned();
            background(move || match stdin.write_all(prompt.as_bytes()) {
                // The child may exit without reading its input.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            })
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                tracing::warn!(backend = %self.label, "backend timed out, killing it");
                let _ = child.kill();
                let _ = child.wait();
                return Err(BackendError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        // Pipes stay open while any process the child left behind holds them.
        if let Some(writer) = writer {
            self.collect(writer, deadline)?;
        }
        let stdout = self.collect(stdout, deadline)?;
        let stderr = self.collect(stderr, deadline)?;

        if !status.success() {
            return Err(BackendError::Failed {
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        let reply = String::from_utf8_lossy(&stdout).trim().to_string();
        if reply.is_empty() {
            Ok(String::from_utf8_lossy(&stderr).trim().to_string())
        } else {
            Ok(reply)
        }
    }
}

fn background<T, F>(work: F) -> Receiver<io::Result<T>>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(work());
    });
    rx
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<io::Result<Vec<u8>>> {
    background(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandBackend {
        CommandBackend::new(
            "sh",
            vec!["-c".to_string(), script.to_string()],
            Duration::from_secs(5),
        )
    }

    #[test]
    fn echoes_stdin() {
        let mut backend = sh("cat");
        assert_eq!(backend.complete("  hello there \n").unwrap(), "hello there");
    }

    #[test]
    fn ignores_unread_input() {
        let mut backend = sh("echo '{\"narration\":\"hi\",\"state_change\":[]}'");
        let reply = backend.complete(&"x".repeat(200_000)).unwrap();
        assert_eq!(reply, "{\"narration\":\"hi\",\"state_change\":[]}");
    }

    #[test]
    fn empty_stdout_falls_back_to_stderr() {
        let mut backend = sh("cat > /dev/null; echo 'model not loaded' >&2");
        assert_eq!(backend.complete("x").unwrap(), "model not loaded");
    }

    #[test]
    fn non_zero_exit_is_failure() {
        let mut backend = sh("cat > /dev/null; echo boom >&2; exit 3");
        match backend.complete("x") {
            Err(BackendError::Failed { status, stderr }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let mut backend =
            CommandBackend::new("gm-no-such-program", vec![], Duration::from_secs(1));
        assert!(matches!(
            backend.complete("x"),
            Err(BackendError::Spawn { .. })
        ));
    }

    #[test]
    fn slow_program_times_out() {
        let mut backend = CommandBackend::new(
            "sleep",
            vec!["5".to_string()],
            Duration::from_millis(200),
        );
        let started = Instant::now();
        assert!(matches!(
            backend.complete("x"),
            Err(BackendError::Timeout(_))
        ));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn lingering_background_process_times_out() {
        let mut backend = CommandBackend::new(
            "sh",
            vec!["-c".to_string(), "sleep 8 & echo hi".to_string()],
            Duration::from_secs(1),
        );
        let started = Instant::now();
        assert!(matches!(
            backend.complete("x"),
            Err(BackendError::Timeout(_))
        ));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn name_lists_program_and_args() {
        let backend = CommandBackend::new(
            "ollama",
            vec!["run".to_string(), "llama3.1:8b".to_string()],
            Duration::from_secs(1),
        );
        assert_eq!(backend.name(), "ollama run llama3.1:8b");
    }
}
