// src/core/mod.rs

/// Pure argv builders for every launch mode.
pub mod commands;
/// Loading `launcher.toml`.
pub mod config_loader;
/// Finding core dumps on disk.
pub mod core_files;
/// Launching syslog-ng and extracting backtraces.
pub mod daemon_executor;
/// Config file location and path expansion.
pub mod paths;
/// The daemon's start parameters.
pub mod start_params;
