use clap::Parser;
use std::ffi::OsString;

/// Options shared by the launch actions.
pub mod args;
/// One handler per action.
pub mod handlers;

/// sng-launch: starts syslog-ng for functional tests.
///
/// Usage: `sng-launch <action> [options...]`
///
/// Actions:
///   run        Start syslog-ng (add --detach to return immediately).
///   valgrind   Start syslog-ng under valgrind's memcheck.
///   strace     Start syslog-ng under strace.
///   gdb        Open an xterm running syslog-ng inside gdb.
///   backtrace  Print the full backtrace of a core file (alias: bt).
///   show       Print the command line a launch would execute (alias: argv).
///
/// Run `sng-launch <action> --help` for the options of an action.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// The action followed by its arguments. Everything after the action is
    /// handed to the action's own parser untouched.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<OsString>,
}
