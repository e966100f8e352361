// src/cli/handlers/commons.rs

// Shared plumbing for the launch handlers: config resolution, output paths and
// reporting.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Serialize, Serializer};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use thiserror::Error;

use crate::{
    CancellationToken,
    cli::args::LaunchArgs,
    core::{config_loader, daemon_executor::DaemonExecutor, paths, start_params::StartParams},
    models::{LaunchMode, LauncherConfig},
    system::{DaemonProcess, ExecutionError, executor::display_command},
};

/// Raised when a foreground run ends with a failure status, so the binary can
/// mirror the daemon's exit code.
#[derive(Error, Debug)]
#[error("'{command}' exited with {}", describe_exit(.code))]
pub struct DaemonExited {
    /// The command as displayed to the user.
    pub command: String,
    /// Exit code, `None` for a signal.
    pub code: Option<i32>,
}

fn describe_exit(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

/// Everything a launch handler needs, resolved from the config file and the
/// command-line overrides.
#[derive(Debug)]
pub struct LaunchContext {
    /// The loaded config, with `--binary` applied.
    pub config: LauncherConfig,
    /// Config start parameters with the CLI overrides layered on.
    pub params: StartParams,
    /// Where default capture files go.
    pub out_dir: PathBuf,
    /// Executor for the resolved binary and tools.
    pub executor: DaemonExecutor,
}

impl LaunchContext {
    /// Loads the config and applies the command-line overrides.
    pub fn resolve(args: &LaunchArgs, cancellation_token: &CancellationToken) -> Result<Self> {
        let mut config = config_loader::load(args.config.as_deref())?;
        if let Some(binary) = &args.binary {
            config.binary = paths::expand_path(binary)?;
        }
        let out_dir = match &args.out_dir {
            Some(dir) => paths::expand_path(dir)?,
            None => config.output_dir.clone(),
        };
        let params = args.params.apply(config.start_params.clone());
        let executor = DaemonExecutor::from_config(&config, cancellation_token.clone());

        log::debug!(
            "Launch context: binary='{}', out_dir='{}'",
            config.binary.display(),
            out_dir.display()
        );
        Ok(Self {
            config,
            params,
            out_dir,
            executor,
        })
    }

    /// An explicit path wins; otherwise the file is placed in the output directory.
    pub fn output_path(&self, explicit: Option<&Path>, default_name: &str) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.out_dir.join(default_name))
    }

    /// Creates the output directory so tools that write their own logs
    /// (valgrind, strace) find it in place.
    pub fn ensure_out_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.out_dir).with_context(|| {
            format!(
                "Could not create output directory '{}'",
                self.out_dir.display()
            )
        })
    }
}

/// A launch described without running it.
#[derive(Serialize, Debug)]
pub struct LaunchPlan {
    /// The launch mode described.
    pub mode: LaunchMode,
    /// The exact argv. JSON output shows it lossily as text.
    #[serde(serialize_with = "serialize_lossy")]
    pub command: Vec<OsString>,
    /// Where the started process's stdout goes.
    pub stdout: PathBuf,
    /// Where the started process's stderr goes.
    pub stderr: PathBuf,
    /// Report or trace file of the wrapping tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_output: Option<PathBuf>,
}

fn serialize_lossy<S: Serializer>(
    command: &[OsString],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(command.iter().map(|arg| arg.to_string_lossy()))
}

/// Reports a started process and its argv.
pub fn print_started(process: &DaemonProcess, what: &str) {
    println!(
        "{} {} (PID {})",
        "Started".green().bold(),
        what,
        process.pid().to_string().yellow()
    );
    println!("  {}", display_command(process.command()).dimmed());
}

/// Prints one labelled output path.
pub fn print_output_location(label: &str, path: &Path) {
    println!("  {:<10} {}", label.blue(), path.display());
}

/// Waits for a foreground process, turning a failure status into [`DaemonExited`].
///
/// An interrupt reaches the whole process group, so the daemon dies with us;
/// when the token is set by then the run counts as cancelled.
pub fn wait_for(mut process: DaemonProcess, cancellation_token: &CancellationToken) -> Result<()> {
    let command = display_command(process.command());
    let status = process
        .wait()
        .with_context(|| format!("Failed to wait for '{}'", command))?;
    if cancellation_token.load(Ordering::SeqCst) {
        return Err(ExecutionError::Cancelled.into());
    }
    if status.success() {
        println!("{}", "Process exited successfully.".green());
        Ok(())
    } else {
        Err(DaemonExited {
            command,
            code: status.code(),
        }
        .into())
    }
}
