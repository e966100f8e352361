// src/cli/handlers/backtrace.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::*;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::commons::LaunchContext;
use crate::{
    CancellationToken,
    cli::args::LaunchArgs,
    constants::{BACKTRACE_STDERR_SUFFIX, BACKTRACE_STDOUT_SUFFIX},
    core::{
        commands::{self, CommandBuildError},
        core_files,
        daemon_executor::DaemonExecutor,
    },
    system::{CommandRunner, ProcessStarter},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the full backtrace stored in one or more core files."
)]
struct BacktraceArgs {
    /// A core file, or a directory whose `core` / `core.<pid>` files are all processed.
    location: PathBuf,

    #[command(flatten)]
    launch: LaunchArgs,

    /// Only print the gdb command lines.
    #[arg(long)]
    dry_run: bool,
}

/// Runs gdb over every core file found at the given location.
pub fn handle(args: Vec<OsString>, cancellation_token: &CancellationToken) -> Result<()> {
    let bt_args = BacktraceArgs::try_parse_from(&args)?;
    let ctx = LaunchContext::resolve(&bt_args.launch, cancellation_token)?;

    let cores = core_files::resolve_core_files(&bt_args.location)
        .with_context(|| format!("Cannot read '{}'", bt_args.location.display()))?;
    if cores.is_empty() {
        println!(
            "{}",
            format!("No core files found in '{}'.", bt_args.location.display()).yellow()
        );
        return Ok(());
    }

    if bt_args.dry_run {
        let mut stdout = std::io::stdout().lock();
        for core in &cores {
            stdout.write_all(dry_run_line(&ctx.executor, core)?.as_encoded_bytes())?;
            stdout.write_all(b"\n")?;
        }
        return Ok(());
    }

    ctx.ensure_out_dir()?;
    extract_backtraces(&ctx.executor, &cores, &ctx.out_dir)
}

/// The backtrace command for `core`, quoted so it can be pasted into a shell.
fn dry_run_line<P, C>(executor: &DaemonExecutor<P, C>, core: &Path) -> Result<OsString, CommandBuildError>
where
    P: ProcessStarter,
    C: CommandRunner,
{
    commands::shell_join(&executor.backtrace_command(core))
}

/// Prints the backtrace of each core in turn. A gdb that exits non-zero does
/// not stop the loop; all failures are reported together at the end.
fn extract_backtraces<P, C>(executor: &DaemonExecutor<P, C>, cores: &[PathBuf], out_dir: &Path) -> Result<()>
where
    P: ProcessStarter,
    C: CommandRunner,
{
    let mut failed = Vec::new();
    for core in cores {
        let stdout = capture_path(out_dir, core, BACKTRACE_STDOUT_SUFFIX);
        let stderr = capture_path(out_dir, core, BACKTRACE_STDERR_SUFFIX);

        println!(
            "\n--- {} '{}' ---",
            "Backtrace of".green(),
            core.display().to_string().yellow()
        );
        let output = executor
            .get_backtrace_from_core(core, &stderr, &stdout)
            .with_context(|| format!("Failed to run gdb on '{}'", core.display()))?;

        print!("{}", output.stdout);
        if !output.success() {
            log::warn!("gdb exited with {:?} for '{}'", output.exit_code, core.display());
            eprint!("{}", output.stderr.dimmed());
            failed.push(core.display().to_string());
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("gdb failed for: {}", failed.join(", ")))
    }
}

/// `<out_dir>/<core file name>_<suffix>`, so captures of several cores never collide.
fn capture_path(out_dir: &Path, core: &Path, suffix: &str) -> PathBuf {
    let mut name = core
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("core"));
    name.push("_");
    name.push(suffix);
    out_dir.join(name)
}
