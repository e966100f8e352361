// src/system/command_executor.rs

use super::executor::{self, ExecutionError};
use crate::{CancellationToken, models::CommandOutput};
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Runs a command to completion and returns what it wrote.
pub trait CommandRunner {
    /// Runs `command` with its output captured to the given files and waits for it.
    fn run(
        &self,
        command: Vec<OsString>,
        stdout_path: &Path,
        stderr_path: &Path,
    ) -> Result<CommandOutput, ExecutionError>;
}

/// The OS-backed [`CommandRunner`].
///
/// Output goes to the given files (so it survives for later inspection) and is
/// read back once the command has exited. A non-zero exit status is reported in
/// [`CommandOutput::exit_code`], not as an error.
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    cancellation_token: CancellationToken,
    poll_interval: Duration,
}

impl CommandExecutor {
    /// An executor that stops its current command once `cancellation_token` is set.
    pub fn new(cancellation_token: CancellationToken) -> Self {
        Self {
            cancellation_token,
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl CommandRunner for CommandExecutor {
    fn run(
        &self,
        command: Vec<OsString>,
        stdout_path: &Path,
        stderr_path: &Path,
    ) -> Result<CommandOutput, ExecutionError> {
        // Pre-flight cancellation check.
        if self.cancellation_token.load(Ordering::SeqCst) {
            return Err(ExecutionError::Cancelled);
        }

        let display = executor::display_command(&command);
        let mut std_command = executor::prepare_command(&command, stdout_path, stderr_path)?;
        log::debug!("Running '{}'", display);
        let mut child = std_command
            .spawn()
            .map_err(|e| ExecutionError::CommandFailed(display.clone(), e))?;

        // Non-blocking wait loop to allow for cancellation.
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if self.cancellation_token.load(Ordering::SeqCst) {
                        log::debug!(
                            "Cancellation requested, killing child process (PID: {})...",
                            child.id()
                        );
                        if let Err(e) = child.kill() {
                            log::warn!("Failed to kill child process {}: {}", child.id(), e);
                        }
                        child.wait().ok();
                        return Err(ExecutionError::Cancelled);
                    }
                    std::thread::sleep(self.poll_interval.max(Duration::from_millis(1)));
                }
                Err(e) => return Err(ExecutionError::CommandFailed(display, e)),
            }
        };

        if !status.success() {
            log::debug!("'{}' exited with {:?}", display, status.code());
        }

        Ok(CommandOutput {
            exit_code: status.code(),
            stdout: read_captured(stdout_path)?,
            stderr: read_captured(stderr_path)?,
        })
    }
}

fn read_captured(path: &Path) -> Result<String, ExecutionError> {
    let bytes = fs::read(path).map_err(|source| ExecutionError::ReadOutput {
        path: path.to_path_buf(),
        source,
    })?;
    // gdb happily prints raw memory; keep what is readable.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn sh(script: &str) -> Vec<OsString> {
        vec![OsString::from("/bin/sh"), OsString::from("-c"), OsString::from(script)]
    }

    fn executor() -> CommandExecutor {
        CommandExecutor::new(Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn test_run_captures_output_and_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let err = dir.path().join("err");

        let output = executor()
            .run(sh("echo hello; echo oops >&2; exit 3"), &out, &err)
            .unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "oops\n");
        // The capture files are kept.
        assert_eq!(fs::read_to_string(&out).unwrap(), "hello\n");
    }

    #[test]
    fn test_run_shared_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let both = dir.path().join("both");

        let output = executor().run(sh("echo a; echo b >&2"), &both, &both).unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "a\nb\n");
        assert_eq!(output.stdout, output.stderr);
    }

    #[test]
    fn test_run_signal_death_has_no_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let output = executor().run(sh("kill -9 $$"), &out, &out).unwrap();
        assert_eq!(output.exit_code, None);
    }

    #[test]
    fn test_run_honours_cancellation_before_start() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let cancelled = CommandExecutor::new(Arc::new(AtomicBool::new(true)));

        let result = cancelled.run(sh("echo never"), &out, &out);
        assert!(matches!(result, Err(ExecutionError::Cancelled)));
        assert!(!out.exists());
    }

    #[test]
    fn test_run_cancellation_kills_running_command() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let token = Arc::new(AtomicBool::new(false));
        let runner = CommandExecutor::new(token.clone());

        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(200));
            token.store(true, Ordering::SeqCst);
        });
        let result = runner.run(sh("sleep 30"), &out, &out);
        canceller.join().unwrap();

        assert!(matches!(result, Err(ExecutionError::Cancelled)));
    }
}
