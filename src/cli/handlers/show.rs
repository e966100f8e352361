// src/cli/handlers/show.rs

use anyhow::Result;
use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use super::commons::{LaunchContext, LaunchPlan};
use crate::{
    CancellationToken,
    cli::args::LaunchArgs,
    constants::{NULL_DEVICE, STDERR_FILENAME, STDOUT_FILENAME, STRACE_LOG_FILENAME, VALGRIND_LOG_FILENAME},
    models::LaunchMode,
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Prints the command line a launch mode would execute, without running it."
)]
struct ShowArgs {
    /// Which launch to describe.
    #[arg(value_enum, default_value_t = LaunchMode::Plain)]
    mode: LaunchMode,

    #[command(flatten)]
    launch: LaunchArgs,

    /// File that would receive syslog-ng's stdout.
    #[arg(long, value_name = "FILE")]
    stdout: Option<PathBuf>,

    /// File that would receive syslog-ng's stderr.
    #[arg(long, value_name = "FILE")]
    stderr: Option<PathBuf>,

    /// Output path of the wrapping tool (valgrind report, strace prefix).
    #[arg(long, value_name = "FILE")]
    tool_output: Option<PathBuf>,

    /// Print the plan as JSON.
    #[arg(long)]
    json: bool,
}

/// Prints the argv of a launch mode without running anything.
pub fn handle(args: Vec<OsString>, cancellation_token: &CancellationToken) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    let ctx = LaunchContext::resolve(&show_args.launch, cancellation_token)?;
    let plan = build_plan(&ctx, &show_args)?;

    if show_args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        // One argument per line, as raw bytes.
        let mut stdout = std::io::stdout().lock();
        for arg in &plan.command {
            stdout.write_all(arg.as_encoded_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn build_plan(ctx: &LaunchContext, show_args: &ShowArgs) -> Result<LaunchPlan> {
    let stdout = ctx.output_path(show_args.stdout.as_deref(), STDOUT_FILENAME);
    let stderr = ctx.output_path(show_args.stderr.as_deref(), STDERR_FILENAME);
    let tool_output = |default_name| ctx.output_path(show_args.tool_output.as_deref(), default_name);
    let executor = &ctx.executor;

    let plan = match show_args.mode {
        LaunchMode::Plain => LaunchPlan {
            mode: LaunchMode::Plain,
            command: executor.construct_command(&ctx.params),
            stdout,
            stderr,
            tool_output: None,
        },
        LaunchMode::Valgrind => {
            let report = tool_output(VALGRIND_LOG_FILENAME);
            LaunchPlan {
                mode: LaunchMode::Valgrind,
                command: executor.valgrind_command(&ctx.params, &report),
                stdout,
                stderr,
                tool_output: Some(report),
            }
        }
        LaunchMode::Strace => {
            let trace = tool_output(STRACE_LOG_FILENAME);
            LaunchPlan {
                mode: LaunchMode::Strace,
                command: executor.strace_command(&ctx.params, &trace),
                stdout,
                stderr,
                tool_output: Some(trace),
            }
        }
        // The daemon's output paths are baked into the gdb command; the xterm
        // itself writes nowhere.
        LaunchMode::Gdb => LaunchPlan {
            mode: LaunchMode::Gdb,
            command: executor.gdb_command(&ctx.params, &stdout, &stderr)?,
            stdout: PathBuf::from(NULL_DEVICE),
            stderr: PathBuf::from(NULL_DEVICE),
            tool_output: None,
        },
    };
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LauncherConfig;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn context_and_args(args: &[&str]) -> (LaunchContext, ShowArgs) {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("launcher.toml");
        std::fs::write(
            &config_path,
            "binary = \"/opt/sng/sbin/syslog-ng\"\noutput_dir = \"/t/out\"\n[start_params]\ntrace = false\n",
        )
        .unwrap();

        let mut full: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        full.push("--config".to_string());
        full.push(config_path.display().to_string());
        let show_args = ShowArgs::try_parse_from(&full).unwrap();
        let token = Arc::new(AtomicBool::new(false));
        let ctx = LaunchContext::resolve(&show_args.launch, &token).unwrap();
        (ctx, show_args)
    }

    #[test]
    fn test_plain_plan_uses_config() {
        let (ctx, args) = context_and_args(&[]);
        let plan = build_plan(&ctx, &args).unwrap();

        assert_eq!(plan.mode, LaunchMode::Plain);
        assert_eq!(plan.command[0], "/opt/sng/sbin/syslog-ng");
        assert!(!plan.command.contains(&OsString::from("--trace")));
        assert_eq!(plan.stdout, PathBuf::from("/t/out").join(STDOUT_FILENAME));
        assert_ne!(LauncherConfig::default().binary, ctx.config.binary);
    }

    #[test]
    fn test_valgrind_plan_defaults_report_into_out_dir() {
        let (ctx, args) = context_and_args(&["valgrind", "--no-debug"]);
        let plan = build_plan(&ctx, &args).unwrap();

        let report = PathBuf::from("/t/out").join(VALGRIND_LOG_FILENAME);
        assert_eq!(plan.tool_output.as_ref(), Some(&report));
        assert!(plan.command.contains(&OsString::from(format!("--log-file={}", report.display()))));
        assert!(!plan.command.contains(&OsString::from("--debug")));
    }

    #[test]
    fn test_gdb_plan_json() {
        let (ctx, args) = context_and_args(&["gdb", "--stdout", "/t/o", "--stderr", "/t/e"]);
        let plan = build_plan(&ctx, &args).unwrap();
        let json: serde_json::Value = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["mode"], "gdb");
        assert_eq!(json["stdout"], "/dev/null");
        assert!(json.get("tool_output").is_none());
        assert_eq!(json["command"][0], "xterm");
    }
}
