//! # System Interaction Layer
//!
//! The boundary between argv construction and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: Shared error type and the plumbing that redirects a command's
//!   output into files.
//! - **`process_executor`**: Starts a command in the background and hands back a
//!   [`process_executor::DaemonProcess`].
//! - **`command_executor`**: Runs a command to completion, with graceful
//!   cancellation, and returns its captured output.

/// Synchronous, cancellable command runs.
pub mod command_executor;
/// Shared error type and output redirection.
pub mod executor;
/// Background process starts.
pub mod process_executor;

pub use command_executor::{CommandExecutor, CommandRunner};
pub use executor::ExecutionError;
pub use process_executor::{DaemonProcess, ProcessExecutor, ProcessStarter};
