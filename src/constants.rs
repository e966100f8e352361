// src/constants.rs

/// Name of the directory under the system config dir that holds `launcher.toml`.
pub const APP_CONFIG_DIRNAME: &str = "sng-launch";

/// Name of the launcher configuration file.
pub const CONFIG_FILENAME: &str = "launcher.toml";

/// Environment variable that points at an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "SNG_LAUNCH_CONFIG";

/// Default daemon binary, resolved through `PATH`.
pub const DEFAULT_BINARY: &str = "syslog-ng";

/// Default directory for stdout/stderr captures and tool logs.
pub const DEFAULT_OUTPUT_DIR: &str = "sng-launch-output";

/// Default capture file for the daemon's stdout.
pub const STDOUT_FILENAME: &str = "syslog_ng_stdout";
/// Default capture file for the daemon's stderr.
pub const STDERR_FILENAME: &str = "syslog_ng_stderr";
/// Default valgrind report file.
pub const VALGRIND_LOG_FILENAME: &str = "valgrind_output";
/// Default strace output prefix; strace appends `.<tid>`.
pub const STRACE_LOG_FILENAME: &str = "strace_output";
/// Suffix of a core's backtrace stdout capture: `<core>_backtrace_stdout`.
pub const BACKTRACE_STDOUT_SUFFIX: &str = "backtrace_stdout";
/// Suffix of a core's backtrace stderr capture.
pub const BACKTRACE_STDERR_SUFFIX: &str = "backtrace_stderr";

/// Where the xterm hosting an interactive gdb session sends its own output.
pub const NULL_DEVICE: &str = "/dev/null";

/// Memcheck options used for every valgrind run. `--log-file` is appended per run.
pub const VALGRIND_ARGS: &[&str] = &[
    "--show-leak-kinds=all",
    "--track-origins=yes",
    "--tool=memcheck",
    "--leak-check=full",
    "--keep-stacktraces=alloc-and-free",
    "--read-var-info=yes",
    "--error-limit=no",
    "--num-callers=40",
    "--verbose",
];

/// strace options: long strings, timestamps, syscall durations, one file per thread.
/// `-o <path>` is appended per run.
pub const STRACE_ARGS: &[&str] = &["-s", "4096", "-tt", "-T", "-ff"];

// Tool defaults, resolved through `PATH`.

/// Default valgrind program.
pub const DEFAULT_VALGRIND: &str = "valgrind";
/// Default gdb program.
pub const DEFAULT_GDB: &str = "gdb";
/// Default strace program.
pub const DEFAULT_STRACE: &str = "strace";
/// Default terminal for interactive gdb.
pub const DEFAULT_XTERM: &str = "xterm";
/// Font face passed to xterm with `-fa`.
pub const DEFAULT_XTERM_FONT: &str = "Monospace";
/// Font size passed to xterm with `-fs`.
pub const DEFAULT_XTERM_FONT_SIZE: u32 = 18;
