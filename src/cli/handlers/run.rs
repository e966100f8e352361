// src/cli/handlers/run.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use super::commons::{self, LaunchContext};
use crate::{
    CancellationToken,
    cli::args::LaunchArgs,
    constants::{STDERR_FILENAME, STDOUT_FILENAME},
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Starts syslog-ng with the configured parameters.")]
struct RunArgs {
    #[command(flatten)]
    launch: LaunchArgs,

    /// File receiving syslog-ng's stdout.
    #[arg(long, value_name = "FILE")]
    stdout: Option<PathBuf>,

    /// File receiving syslog-ng's stderr.
    #[arg(long, value_name = "FILE")]
    stderr: Option<PathBuf>,

    /// Return as soon as the process has started instead of waiting for it.
    #[arg(long, short)]
    detach: bool,
}

/// Starts syslog-ng and, unless detached, waits for it to exit.
pub fn handle(args: Vec<OsString>, cancellation_token: &CancellationToken) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let ctx = LaunchContext::resolve(&run_args.launch, cancellation_token)?;
    ctx.ensure_out_dir()?;

    let stdout = ctx.output_path(run_args.stdout.as_deref(), STDOUT_FILENAME);
    let stderr = ctx.output_path(run_args.stderr.as_deref(), STDERR_FILENAME);

    let process = ctx
        .executor
        .run_process(&ctx.params, &stderr, &stdout)
        .with_context(|| format!("Failed to start '{}'", ctx.executor.binary().display()))?;

    commons::print_started(&process, "syslog-ng");
    commons::print_output_location("stdout", &stdout);
    commons::print_output_location("stderr", &stderr);

    if run_args.detach {
        return Ok(());
    }
    commons::wait_for(process, cancellation_token)
}
