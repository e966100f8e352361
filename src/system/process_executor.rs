// src/system/process_executor.rs

use super::executor::{self, ExecutionError};
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Child, ExitStatus};

/// Starts a command in the background with its output redirected to files.
pub trait ProcessStarter {
    /// Spawns `command` and returns without waiting for it.
    fn start(
        &self,
        command: Vec<OsString>,
        stdout_path: &Path,
        stderr_path: &Path,
    ) -> Result<DaemonProcess, ExecutionError>;
}

/// A started process together with the argv it was started with.
///
/// This is a thin handle: it does not restart, time out or otherwise supervise
/// the process.
#[derive(Debug)]
pub struct DaemonProcess {
    command: Vec<OsString>,
    child: Child,
}

impl DaemonProcess {
    /// Wraps a spawned child.
    pub fn new(command: Vec<OsString>, child: Child) -> Self {
        Self { command, child }
    }

    /// The argv the process was started with.
    pub fn command(&self) -> &[OsString] {
        &self.command
    }

    /// OS process id.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Polls for exit without blocking.
    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Blocks until the process exits.
    pub fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait()
    }

    /// Sends SIGKILL (or the platform equivalent).
    pub fn kill(&mut self) -> io::Result<()> {
        self.child.kill()
    }

    /// Gives up the handle and returns the raw child.
    pub fn into_child(self) -> Child {
        self.child
    }
}

/// The OS-backed [`ProcessStarter`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    /// The executor; it holds no state.
    pub fn new() -> Self {
        Self
    }
}

impl ProcessStarter for ProcessExecutor {
    fn start(
        &self,
        command: Vec<OsString>,
        stdout_path: &Path,
        stderr_path: &Path,
    ) -> Result<DaemonProcess, ExecutionError> {
        let mut std_command = executor::prepare_command(&command, stdout_path, stderr_path)?;
        let child = std_command.spawn().map_err(|e| {
            ExecutionError::CommandFailed(executor::display_command(&command), e)
        })?;

        log::info!(
            "Started '{}' (PID: {}), stdout: '{}', stderr: '{}'",
            executor::display_command(&command),
            child.id(),
            stdout_path.display(),
            stderr_path.display()
        );
        Ok(DaemonProcess::new(command, child))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    fn sh(script: &str) -> Vec<OsString> {
        vec![OsString::from("/bin/sh"), OsString::from("-c"), OsString::from(script)]
    }

    #[test]
    fn test_start_redirects_output_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("stdout");
        let err = dir.path().join("stderr");

        let mut process = ProcessExecutor::new()
            .start(sh("echo to-out; echo to-err >&2"), &out, &err)
            .unwrap();
        let status = process.wait().unwrap();

        assert!(status.success());
        assert_eq!(fs::read_to_string(&out).unwrap(), "to-out\n");
        assert_eq!(fs::read_to_string(&err).unwrap(), "to-err\n");
        assert_eq!(process.command()[0], "/bin/sh");
    }

    #[test]
    fn test_start_returns_before_process_exits() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("stdout");

        let mut process = ProcessExecutor::new()
            .start(sh("sleep 30"), &out, &out)
            .unwrap();
        assert!(process.pid() > 0);
        assert!(process.try_wait().unwrap().is_none());

        process.kill().unwrap();
        assert!(!process.wait().unwrap().success());
    }

    #[test]
    fn test_start_passes_non_utf8_arguments_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("stdout");
        let mut command = sh("printf %s \"$1\"");
        command.push(OsString::from("sh"));
        command.push(OsStr::from_bytes(b"--cfgfile=/tmp/sng-\xff.conf").to_os_string());

        let mut process = ProcessExecutor::new().start(command, &out, &out).unwrap();
        assert!(process.wait().unwrap().success());
        assert_eq!(fs::read(&out).unwrap(), b"--cfgfile=/tmp/sng-\xff.conf".to_vec());
    }

    #[test]
    fn test_start_reports_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("stdout");
        let result = ProcessExecutor::new().start(
            vec![OsString::from("/nonexistent/sng-launch-test-binary")],
            &out,
            &out,
        );
        assert!(matches!(result, Err(ExecutionError::CommandFailed(_, _))));
    }
}
