// src/cli/handlers/gdb.rs

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
#[command(
    no_binary_name = true,
    about = "Opens an xterm with gdb attached to a fresh syslog-ng."
)]
struct GdbArgs {
    #[command(flatten)]
    launch: LaunchArgs,

    /// File receiving syslog-ng's stdout (redirected inside gdb).
    #[arg(long, value_name = "FILE")]
    stdout: Option<PathBuf>,

    /// File receiving syslog-ng's stderr (redirected inside gdb).
    #[arg(long, value_name = "FILE")]
    stderr: Option<PathBuf>,
}

/// Opens the gdb session. It is interactive, so this returns once the
/// terminal window is up.
pub fn handle(args: Vec<OsString>, cancellation_token: &CancellationToken) -> Result<()> {
    let gdb_args = GdbArgs::try_parse_from(&args)?;
    let ctx = LaunchContext::resolve(&gdb_args.launch, cancellation_token)?;
    ctx.ensure_out_dir()?;

    let stdout = ctx.output_path(gdb_args.stdout.as_deref(), STDOUT_FILENAME);
    let stderr = ctx.output_path(gdb_args.stderr.as_deref(), STDERR_FILENAME);

    let process = ctx
        .executor
        .run_process_with_gdb(&ctx.params, &stderr, &stdout)
        .context("Failed to open the gdb session")?;

    commons::print_started(&process, "gdb session");
    commons::print_output_location("stdout", &stdout);
    commons::print_output_location("stderr", &stderr);
    Ok(())
}
