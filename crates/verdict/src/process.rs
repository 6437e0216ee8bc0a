//! Subprocess adapter for the core's `ToolInvoker` capability.
//!
//! Owns the plumbing the pipeline deliberately treats as opaque: spawn,
//! capture both streams, and enforce the kill deadline. A run killed at the
//! deadline surfaces with no exit code; a binary that never starts surfaces
//! as `startup_error` data instead of an error value.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use camino::Utf8Path;
use verdict_core::{Invocation, ToolInvoker};

/// Poll interval while waiting for the checker to exit.
const WAIT_POLL_MS: u64 = 25;

pub struct ProcessInvoker {
    timeout: Duration,
}

impl ProcessInvoker {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ToolInvoker for ProcessInvoker {
    fn invoke(&self, bin: &str, args: &[String], cwd: &Utf8Path) -> Invocation {
        let mut child = match Command::new(bin)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return Invocation {
                    startup_error: Some(e.to_string()),
                    ..Invocation::default()
                };
            }
        };

        // Drain both pipes on their own threads so a chatty checker can't
        // deadlock against a full pipe buffer.
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let deadline = Instant::now() + self.timeout;
        let exit_code = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status.code(),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        tracing::warn!("checker '{bin}' exceeded timeout, killing");
                        let _ = child.kill();
                        let _ = child.wait();
                        break None;
                    }
                    thread::sleep(Duration::from_millis(WAIT_POLL_MS));
                }
                Err(e) => {
                    tracing::warn!("waiting on checker '{bin}' failed: {e}");
                    let _ = child.kill();
                    let _ = child.wait();
                    break None;
                }
            }
        };

        Invocation {
            stdout: join_reader(stdout_reader),
            stderr: join_reader(stderr_reader),
            exit_code,
            startup_error: None,
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut stream: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stream.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoker() -> ProcessInvoker {
        ProcessInvoker::new(Duration::from_secs(5))
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_and_exit_code() {
        let result = invoker().invoke(
            "sh",
            &["-c".to_string(), "echo hello".to_string()],
            Utf8Path::new("/tmp"),
        );
        assert!(result.started());
        assert_eq!(result.stdout.trim(), "hello");
        assert_eq!(result.exit_code, Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn captures_stderr_separately() {
        let result = invoker().invoke(
            "sh",
            &["-c".to_string(), "echo oops >&2; exit 3".to_string()],
            Utf8Path::new("/tmp"),
        );
        assert_eq!(result.stderr.trim(), "oops");
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn missing_binary_is_a_startup_error_not_a_panic() {
        let result = invoker().invoke(
            "definitely-not-a-real-binary-4521",
            &[],
            Utf8Path::new("."),
        );
        assert!(!result.started());
        assert!(result.exit_code.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn timeout_kills_and_reports_no_exit_code() {
        let result = ProcessInvoker::new(Duration::from_millis(200)).invoke(
            "sh",
            &["-c".to_string(), "sleep 30".to_string()],
            Utf8Path::new("/tmp"),
        );
        assert!(result.started());
        assert_eq!(result.exit_code, None);
    }
}
