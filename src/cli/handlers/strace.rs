// src/cli/handlers/strace.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use super::commons::{self, LaunchContext};
use crate::{
    CancellationToken,
    cli::args::LaunchArgs,
    constants::{STDERR_FILENAME, STDOUT_FILENAME, STRACE_LOG_FILENAME},
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Starts syslog-ng under strace.")]
struct StraceArgs {
    #[command(flatten)]
    launch: LaunchArgs,

    #[arg(long, value_name = "FILE")]
    stdout: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    stderr: Option<PathBuf>,

    /// Prefix of the per-thread trace files (strace appends `.<tid>`).
    #[arg(long, short, value_name = "PREFIX")]
    output: Option<PathBuf>,

    /// Return as soon as the process has started instead of waiting for it.
    #[arg(long, short)]
    detach: bool,
}

/// Starts syslog-ng under strace and, unless detached, waits for it.
pub fn handle(args: Vec<OsString>, cancellation_token: &CancellationToken) -> Result<()> {
    let strace_args = StraceArgs::try_parse_from(&args)?;
    let ctx = LaunchContext::resolve(&strace_args.launch, cancellation_token)?;
    ctx.ensure_out_dir()?;

    let stdout = ctx.output_path(strace_args.stdout.as_deref(), STDOUT_FILENAME);
    let stderr = ctx.output_path(strace_args.stderr.as_deref(), STDERR_FILENAME);
    let trace = ctx.output_path(strace_args.output.as_deref(), STRACE_LOG_FILENAME);

    let process = ctx
        .executor
        .run_process_with_strace(&ctx.params, &stderr, &stdout, &trace)
        .context("Failed to start syslog-ng under strace")?;

    commons::print_started(&process, "syslog-ng under strace");
    commons::print_output_location("stdout", &stdout);
    commons::print_output_location("stderr", &stderr);
    commons::print_output_location("strace", &trace);

    if strace_args.detach {
        return Ok(());
    }
    commons::wait_for(process, cancellation_token)
}
