// src/bin/sng-launch.rs

//! The `sng-launch` command-line entry point.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::*;
use sng_launch::{
    CancellationToken,
    cli::{
        Cli,
        handlers::{self, commons::DaemonExited},
    },
    system::ExecutionError,
};
use std::ffi::OsString;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// --- Command Definition and Registry ---

/// A CLI action, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<OsString>, &CancellationToken) -> Result<()>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "backtrace",
        aliases: &["bt"],
        handler: handlers::backtrace::handle,
    },
    CommandDefinition {
        name: "gdb",
        aliases: &[],
        handler: handlers::gdb::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &["start"],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &["argv"],
        handler: handlers::show::handle,
    },
    CommandDefinition {
        name: "strace",
        aliases: &[],
        handler: handlers::strace::handle,
    },
    CommandDefinition {
        name: "valgrind",
        aliases: &["vg"],
        handler: handlers::valgrind::handle,
    },
];

fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

fn main() {
    let cancellation_token = Arc::new(AtomicBool::new(false));
    env_logger::init();

    let handler_token = cancellation_token.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.store(true, Ordering::SeqCst)) {
        log::warn!("Could not install the Ctrl-C handler: {}", e);
    }

    if let Err(e) = run_cli(Cli::parse(), cancellation_token) {
        // --- Centralized Error Handling ---
        // clap help/usage errors already carry their own formatting.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }

        let code = exit_code_for(&e);
        if code != EXIT_CANCELLED {
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        }
        std::process::exit(code);
    }
}

/// 128 + SIGINT, as a shell reports an interrupted command.
const EXIT_CANCELLED: i32 = 130;

/// Cancelled runs exit with 130, a failed foreground daemon with its own exit
/// code, everything else with 1.
fn exit_code_for(error: &anyhow::Error) -> i32 {
    if let Some(ExecutionError::Cancelled) = error.downcast_ref::<ExecutionError>() {
        return EXIT_CANCELLED;
    }
    if let Some(exited) = error.downcast_ref::<DaemonExited>()
        && let Some(code) = exited.code
    {
        return code;
    }
    1
}

fn run_cli(cli: Cli, cancellation_token: CancellationToken) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut args = cli.args;
    if args.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }
    let action = args.remove(0);

    match action.to_str().and_then(find_command) {
        Some(command) => (command.handler)(args, &cancellation_token),
        None => {
            let known: Vec<&str> = COMMAND_REGISTRY.iter().map(|cmd| cmd.name).collect();
            Err(anyhow::anyhow!(
                "Unknown action '{}'. Available actions: {}",
                action.to_string_lossy().as_ref().cyan(),
                known.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_for_cancelled_run() {
        let error = anyhow::Error::from(ExecutionError::Cancelled);
        assert_eq!(exit_code_for(&error), 130);
    }

    #[test]
    fn test_exit_code_mirrors_daemon() {
        let exited = |code| {
            anyhow::Error::from(DaemonExited {
                command: "syslog-ng -F".to_string(),
                code,
            })
        };
        assert_eq!(exit_code_for(&exited(Some(3))), 3);
        assert_eq!(exit_code_for(&exited(None)), 1);
        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), 1);
    }

    #[test]
    fn test_every_action_resolves() {
        for name in ["run", "start", "valgrind", "vg", "strace", "gdb", "backtrace", "bt", "show", "argv"] {
            assert!(find_command(name).is_some(), "{}", name);
        }
        assert!(find_command("debug").is_none());
    }

    #[test]
    fn test_unknown_action_lists_known_ones() {
        let cli = Cli::parse_from(["sng-launch", "explode"]);
        let err = run_cli(cli, Arc::new(AtomicBool::new(false))).unwrap_err();
        assert!(err.to_string().contains("run, "));
    }
}
