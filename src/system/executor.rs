// src/system/executor.rs

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

/// Failures while starting or running an external command.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The argv was empty.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// A capture file could not be created.
    #[error("Could not open output file '{path}': {source}")]
    OutputFile {
        /// The capture file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Spawning or waiting failed; carries the rendered command.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    /// A capture file could not be read back.
    #[error("Could not read captured output from '{path}': {source}")]
    ReadOutput {
        /// The capture file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The cancellation token was set.
    #[error("Operation was cancelled by the user.")]
    Cancelled,
}

/// Renders an argv for messages and logs. Not for re-execution: bytes that
/// are not UTF-8 are shown as U+FFFD.
pub fn display_command(command: &[OsString]) -> String {
    command
        .iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Creates (or truncates) an output file, creating its parent directory first.
pub(crate) fn create_output_file(path: &Path) -> Result<File, ExecutionError> {
    let to_err = |source| ExecutionError::OutputFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(to_err)?;
    }
    File::create(path).map_err(to_err)
}

/// Prepares a command whose stdout and stderr go to the given files and whose
/// stdin is closed.
///
/// Both paths may name the same file; it is then opened once and shared.
pub(crate) fn prepare_command(
    command: &[OsString],
    stdout_path: &Path,
    stderr_path: &Path,
) -> Result<StdCommand, ExecutionError> {
    let (program, args) = command.split_first().ok_or(ExecutionError::EmptyCommand)?;

    let stdout = create_output_file(stdout_path)?;
    let stderr = if stdout_path == stderr_path {
        stdout
            .try_clone()
            .map_err(|source| ExecutionError::OutputFile {
                path: stderr_path.to_path_buf(),
                source,
            })?
    } else {
        create_output_file(stderr_path)?
    };

    let mut std_command = StdCommand::new(program);
    std_command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));
    Ok(std_command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_rejects_empty_command() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let result = prepare_command(&[], &out, &out);
        assert!(matches!(result, Err(ExecutionError::EmptyCommand)));
        // Nothing is created for a command that never runs.
        assert!(!out.exists());
    }

    #[test]
    fn test_create_output_file_makes_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("stdout");
        create_output_file(&nested).unwrap();
        assert!(nested.is_file());
    }

    #[test]
    fn test_display_command() {
        let command = vec![OsString::from("gdb"), OsString::from("--batch")];
        assert_eq!(display_command(&command), "gdb --batch");
    }
}
