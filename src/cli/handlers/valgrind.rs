// src/cli/handlers/valgrind.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use super::commons::{self, LaunchContext};
use crate::{
    CancellationToken,
    cli::args::LaunchArgs,
    constants::{STDERR_FILENAME, STDOUT_FILENAME, VALGRIND_LOG_FILENAME},
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Starts syslog-ng under valgrind's memcheck.")]
struct ValgrindArgs {
    #[command(flatten)]
    launch: LaunchArgs,

    #[arg(long, value_name = "FILE")]
    stdout: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    stderr: Option<PathBuf>,

    /// File receiving valgrind's report.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Return as soon as the process has started instead of waiting for it.
    #[arg(long, short)]
    detach: bool,
}

/// Starts syslog-ng under memcheck and, unless detached, waits for it.
pub fn handle(args: Vec<OsString>, cancellation_token: &CancellationToken) -> Result<()> {
    let valgrind_args = ValgrindArgs::try_parse_from(&args)?;
    let ctx = LaunchContext::resolve(&valgrind_args.launch, cancellation_token)?;
    ctx.ensure_out_dir()?;

    let stdout = ctx.output_path(valgrind_args.stdout.as_deref(), STDOUT_FILENAME);
    let stderr = ctx.output_path(valgrind_args.stderr.as_deref(), STDERR_FILENAME);
    let report = ctx.output_path(valgrind_args.log_file.as_deref(), VALGRIND_LOG_FILENAME);

    let process = ctx
        .executor
        .run_process_with_valgrind(&ctx.params, &stderr, &stdout, &report)
        .context("Failed to start syslog-ng under valgrind")?;

    commons::print_started(&process, "syslog-ng under valgrind");
    commons::print_output_location("stdout", &stdout);
    commons::print_output_location("stderr", &stderr);
    commons::print_output_location("valgrind", &report);

    if valgrind_args.detach {
        return Ok(());
    }
    commons::wait_for(process, cancellation_token)
}
