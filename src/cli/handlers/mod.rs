// src/cli/handlers/mod.rs

// One module per CLI action.

/// `backtrace`: gdb over core files.
pub mod backtrace;
/// Plumbing shared by the handlers.
pub mod commons;
/// `gdb`: interactive session in an xterm.
pub mod gdb;
/// `run`: plain start.
pub mod run;
/// `show`: print a launch without running it.
pub mod show;
/// `strace`: start under strace.
pub mod strace;
/// `valgrind`: start under memcheck.
pub mod valgrind;
