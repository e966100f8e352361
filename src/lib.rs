//! # sng-launch
//!
//! Process-launch helpers for syslog-ng functional tests: build the daemon's
//! command line, optionally wrap it with valgrind, gdb or strace, start it in the
//! background, or pull a backtrace out of a core file after a crash.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Shared flag that asks a running synchronous command to stop.
pub type CancellationToken = Arc<AtomicBool>;

/// Command-line surface: the top-level parser, shared options and handlers.
pub mod cli;
/// File names, defaults and fixed tool options.
pub mod constants;
/// Argv construction, configuration and the daemon executor.
pub mod core;
/// Configuration and result models.
pub mod models;
/// Process spawning and output capture.
pub mod system;
