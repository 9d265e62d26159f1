//! Bounded external process execution
//!
//! Both the lint analyzer and the completion backend run as external
//! processes that must never hang the session: every invocation carries a
//! deadline, and the lint path additionally carries a cancellation flag
//! flipped when a newer snapshot supersedes the running analysis.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};

/// How often the child is polled for exit, cancellation and the deadline
const POLL_INTERVAL: Duration = Duration::from_millis(15);

/// Captured output of a completed child process
#[derive(Debug)]
pub struct ExecOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run a command to completion with a deadline and an optional
/// cancellation flag.
///
/// Returns `Ok(None)` if cancelled, `Ok(Some(output))` on natural exit
/// (regardless of exit status), and `Err` on spawn failure or deadline
/// expiry. The child is killed on cancellation and timeout.
pub fn run_with_deadline(
    mut command: Command,
    timeout: Duration,
    cancel: Option<&Arc<AtomicBool>>,
) -> Result<Option<ExecOutput>> {
    command.stdout(Stdio::piped()).stderr(Stdio::piped()).stdin(Stdio::null());

    let mut child = command
        .spawn()
        .with_context(|| format!("failed to spawn {:?}", command.get_program()))?;

    // Drain pipes on their own threads so a chatty child cannot block on a
    // full pipe buffer while we poll for exit.
    let stdout_handle = child.stdout.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });
    let stderr_handle = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(cancel) = cancel {
            if cancel.load(Ordering::Relaxed) {
                let _ = child.kill();
                let _ = child.wait();
                join_reader(stdout_handle);
                join_reader(stderr_handle);
                return Ok(None);
            }
        }

        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    join_reader(stdout_handle);
                    join_reader(stderr_handle);
                    return Err(anyhow!("process timed out after {:?}", timeout));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                join_reader(stdout_handle);
                join_reader(stderr_handle);
                return Err(anyhow!("failed to wait for process: {}", e));
            }
        }
    };

    let stdout = join_reader(stdout_handle).unwrap_or_default();
    let stderr = join_reader(stderr_handle).unwrap_or_default();

    Ok(Some(ExecOutput {
        success: status.success(),
        stdout,
        stderr,
    }))
}

fn join_reader(handle: Option<std::thread::JoinHandle<String>>) -> Option<String> {
    handle.and_then(|h| h.join().ok())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn test_captures_stdout_and_status() {
        let out = run_with_deadline(sh("echo hello"), Duration::from_secs(5), None)
            .unwrap()
            .unwrap();
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn test_nonzero_exit_is_not_an_error() {
        let out = run_with_deadline(sh("echo oops >&2; exit 3"), Duration::from_secs(5), None)
            .unwrap()
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[test]
    fn test_deadline_kills_hanging_child() {
        let start = Instant::now();
        let result = run_with_deadline(sh("sleep 30"), Duration::from_millis(200), None);
        assert!(result.is_err());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_cancellation_returns_none() {
        let cancel = Arc::new(AtomicBool::new(true));
        let result =
            run_with_deadline(sh("sleep 30"), Duration::from_secs(30), Some(&cancel)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_spawn_failure_is_an_error() {
        let cmd = Command::new("/nonexistent/analyzer-binary");
        assert!(run_with_deadline(cmd, Duration::from_secs(1), None).is_err());
    }
}
