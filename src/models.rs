// src/models.rs

use crate::{constants, core::start_params::StartParams};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// --- CONFIG MODELS (FOR TOML) ---
// These are what the user writes in launcher.toml.

/// Programs and presentation settings for the diagnostic wrappers.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ToolsConfig {
    /// valgrind program.
    pub valgrind: PathBuf,
    /// gdb program, used both interactively and for backtraces.
    pub gdb: PathBuf,
    /// strace program.
    pub strace: PathBuf,
    /// Terminal that hosts the interactive gdb session.
    pub xterm: PathBuf,
    /// xterm font face (`-fa`).
    pub xterm_font: String,
    /// xterm font size (`-fs`).
    pub xterm_font_size: u32,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            valgrind: PathBuf::from(constants::DEFAULT_VALGRIND),
            gdb: PathBuf::from(constants::DEFAULT_GDB),
            strace: PathBuf::from(constants::DEFAULT_STRACE),
            xterm: PathBuf::from(constants::DEFAULT_XTERM),
            xterm_font: constants::DEFAULT_XTERM_FONT.to_string(),
            xterm_font_size: constants::DEFAULT_XTERM_FONT_SIZE,
        }
    }
}

/// The contents of `launcher.toml`. Every key is optional.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
    /// The syslog-ng binary under test.
    pub binary: PathBuf,
    /// Where captured output and tool logs are written when no explicit path is given.
    pub output_dir: PathBuf,
    /// Diagnostic tool settings (`[tools]`).
    pub tools: ToolsConfig,
    /// Base start parameters (`[start_params]`); CLI flags are layered on top.
    pub start_params: StartParams,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(constants::DEFAULT_BINARY),
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            tools: ToolsConfig::default(),
            start_params: StartParams::default(),
        }
    }
}

// --- EXECUTION MODELS ---

/// Result of a command that was run to completion.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Everything the command wrote to stdout.
    pub stdout: String,
    /// Everything the command wrote to stderr.
    pub stderr: String,
}

impl CommandOutput {
    /// `true` only for exit code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// The ways the daemon can be launched.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// The daemon on its own.
    Plain,
    /// Under valgrind's memcheck.
    Valgrind,
    /// Inside gdb, in an xterm.
    Gdb,
    /// Under strace.
    Strace,
}
