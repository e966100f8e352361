//! # Daemon Executor
//!
//! Launches syslog-ng for a test: plainly, under valgrind, under strace, or in an
//! interactive gdb session. It also extracts a full backtrace from a core file
//! after a crash.
//!
//! Argv construction lives in [`commands`]; this type only pairs the configured
//! binary and tools with the two executors. Both executors are injectable so
//! harness code (and tests) can substitute their own.

use crate::{
    CancellationToken,
    constants::NULL_DEVICE,
    core::{
        commands::{self, CommandBuildError},
        start_params::StartParams,
    },
    models::{CommandOutput, LauncherConfig, ToolsConfig},
    system::{
        CommandExecutor, CommandRunner, DaemonProcess, ExecutionError, ProcessExecutor,
        ProcessStarter,
    },
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a launch or a backtrace run did not happen.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The command line could not be rendered.
    #[error(transparent)]
    Build(#[from] CommandBuildError),
    /// The command could not be started or run.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Launches one syslog-ng binary with a fixed set of diagnostic tools.
#[derive(Debug, Clone)]
pub struct DaemonExecutor<P = ProcessExecutor, C = CommandExecutor> {
    binary: PathBuf,
    tools: ToolsConfig,
    process_executor: P,
    command_executor: C,
}

impl DaemonExecutor {
    /// An executor backed by the real OS executors and the default tool names.
    pub fn new(binary: impl Into<PathBuf>, cancellation_token: CancellationToken) -> Self {
        Self::with_executors(
            binary,
            ToolsConfig::default(),
            ProcessExecutor::new(),
            CommandExecutor::new(cancellation_token),
        )
    }

    /// An executor for the binary and tools named in `launcher.toml`.
    pub fn from_config(config: &LauncherConfig, cancellation_token: CancellationToken) -> Self {
        Self::with_executors(
            config.binary.clone(),
            config.tools.clone(),
            ProcessExecutor::new(),
            CommandExecutor::new(cancellation_token),
        )
    }
}

impl<P: ProcessStarter, C: CommandRunner> DaemonExecutor<P, C> {
    /// An executor with caller-supplied process and command executors.
    pub fn with_executors(
        binary: impl Into<PathBuf>,
        tools: ToolsConfig,
        process_executor: P,
        command_executor: C,
    ) -> Self {
        Self {
            binary: binary.into(),
            tools,
            process_executor,
            command_executor,
        }
    }

    /// The daemon binary.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// The configured diagnostic tools.
    pub fn tools(&self) -> &ToolsConfig {
        &self.tools
    }

    /// `<binary> <params...>`
    pub fn construct_command(&self, params: &StartParams) -> Vec<OsString> {
        commands::daemon_command(&self.binary, params)
    }

    /// The argv [`Self::run_process_with_valgrind`] starts.
    pub fn valgrind_command(&self, params: &StartParams, valgrind_output_path: &Path) -> Vec<OsString> {
        commands::valgrind_command(&self.tools, &self.binary, params, valgrind_output_path)
    }

    /// The argv [`Self::run_process_with_strace`] starts.
    pub fn strace_command(&self, params: &StartParams, strace_output_path: &Path) -> Vec<OsString> {
        commands::strace_command(&self.tools, &self.binary, params, strace_output_path)
    }

    /// The argv [`Self::run_process_with_gdb`] starts.
    pub fn gdb_command(
        &self,
        params: &StartParams,
        stdout_path: &Path,
        stderr_path: &Path,
    ) -> Result<Vec<OsString>, CommandBuildError> {
        commands::gdb_command(&self.tools, &self.binary, params, stdout_path, stderr_path)
    }

    /// The argv [`Self::get_backtrace_from_core`] runs.
    pub fn backtrace_command(&self, core_file_path: &Path) -> Vec<OsString> {
        commands::backtrace_command(&self.tools, &self.binary, core_file_path)
    }

    /// Starts syslog-ng in the background.
    pub fn run_process(
        &self,
        params: &StartParams,
        stderr_path: &Path,
        stdout_path: &Path,
    ) -> Result<DaemonProcess, LaunchError> {
        let command = self.construct_command(params);
        Ok(self.start(command, stdout_path, stderr_path)?)
    }

    /// Starts syslog-ng under valgrind's memcheck. The valgrind report goes to
    /// `valgrind_output_path`.
    pub fn run_process_with_valgrind(
        &self,
        params: &StartParams,
        stderr_path: &Path,
        stdout_path: &Path,
        valgrind_output_path: &Path,
    ) -> Result<DaemonProcess, LaunchError> {
        let command = self.valgrind_command(params, valgrind_output_path);
        Ok(self.start(command, stdout_path, stderr_path)?)
    }

    /// Opens an xterm running gdb, which in turn runs syslog-ng with its output
    /// redirected to `stdout_path` and `stderr_path`.
    ///
    /// The returned process is the xterm; its own output is discarded.
    pub fn run_process_with_gdb(
        &self,
        params: &StartParams,
        stderr_path: &Path,
        stdout_path: &Path,
    ) -> Result<DaemonProcess, LaunchError> {
        let command = self.gdb_command(params, stdout_path, stderr_path)?;
        let null = Path::new(NULL_DEVICE);
        Ok(self.start(command, null, null)?)
    }

    /// Starts syslog-ng under strace. With `-ff`, strace writes one file per
    /// thread, named `<strace_output_path>.<tid>`.
    pub fn run_process_with_strace(
        &self,
        params: &StartParams,
        stderr_path: &Path,
        stdout_path: &Path,
        strace_output_path: &Path,
    ) -> Result<DaemonProcess, LaunchError> {
        let command = self.strace_command(params, strace_output_path);
        Ok(self.start(command, stdout_path, stderr_path)?)
    }

    /// Runs `gdb --batch` against a core file and waits for the full backtrace.
    pub fn get_backtrace_from_core(
        &self,
        core_file_path: &Path,
        stderr_path: &Path,
        stdout_path: &Path,
    ) -> Result<CommandOutput, LaunchError> {
        let command = self.backtrace_command(core_file_path);
        log::info!(
            "Extracting backtrace from '{}' into '{}'",
            core_file_path.display(),
            stdout_path.display()
        );
        Ok(self
            .command_executor
            .run(command, stdout_path, stderr_path)?)
    }

    fn start(
        &self,
        command: Vec<OsString>,
        stdout_path: &Path,
        stderr_path: &Path,
    ) -> Result<DaemonProcess, ExecutionError> {
        log::debug!("Launching: {:?}", command);
        self.process_executor
            .start(command, stdout_path, stderr_path)
    }
}
