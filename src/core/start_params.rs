// src/core/start_params.rs

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Describes how syslog-ng is invoked.
///
/// Every boolean renders as a bare switch when set. Every path renders as a
/// single `--key=value` token when present and is omitted otherwise. The default
/// value is the configuration the functional tests run with: foreground, with
/// core dumps enabled and all diagnostics turned on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StartParams {
    /// `--foreground`
    pub foreground: bool,
    /// `--enable-core`
    pub enable_core: bool,
    /// `--stderr`
    pub stderr: bool,
    /// `--debug`
    pub debug: bool,
    /// `--trace`
    pub trace: bool,
    /// `--verbose`
    pub verbose: bool,
    /// `--startup-debug`
    pub startup_debug: bool,
    /// `--no-caps`
    pub no_caps: bool,
    /// `--syntax-only`
    pub syntax_only: bool,
    /// `--version`
    pub version: bool,
    /// `--cfgfile=<path>`
    pub config_path: Option<PathBuf>,
    /// `--persist-file=<path>`
    pub persist_path: Option<PathBuf>,
    /// `--pidfile=<path>`
    pub pid_path: Option<PathBuf>,
    /// `--control=<path>`
    pub control_socket_path: Option<PathBuf>,
    /// `--preprocess-into=<path>`
    pub preprocess_into: Option<PathBuf>,
}

impl Default for StartParams {
    fn default() -> Self {
        Self {
            foreground: true,
            enable_core: true,
            stderr: true,
            debug: true,
            trace: true,
            verbose: true,
            startup_debug: true,
            no_caps: true,
            syntax_only: false,
            version: false,
            config_path: None,
            persist_path: None,
            pid_path: None,
            control_socket_path: None,
            preprocess_into: None,
        }
    }
}

impl StartParams {
    /// A parameter set with every switch off and no paths.
    pub fn bare() -> Self {
        Self {
            foreground: false,
            enable_core: false,
            stderr: false,
            debug: false,
            trace: false,
            verbose: false,
            startup_debug: false,
            no_caps: false,
            ..Self::default()
        }
    }

    /// Sets the configuration file.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Sets the persist file.
    pub fn with_persist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persist_path = Some(path.into());
        self
    }

    /// Sets the PID file.
    pub fn with_pid_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pid_path = Some(path.into());
        self
    }

    /// Sets the control socket.
    pub fn with_control_socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.control_socket_path = Some(path.into());
        self
    }

    /// Sets the file the preprocessed configuration is written to.
    pub fn with_preprocess_into(mut self, path: impl Into<PathBuf>) -> Self {
        self.preprocess_into = Some(path.into());
        self
    }

    /// Renders the parameters as command-line arguments, in a fixed order:
    /// switches first, then path options. Paths keep their exact bytes.
    pub fn format(&self) -> Vec<OsString> {
        let switches = [
            (self.foreground, "--foreground"),
            (self.enable_core, "--enable-core"),
            (self.stderr, "--stderr"),
            (self.debug, "--debug"),
            (self.trace, "--trace"),
            (self.verbose, "--verbose"),
            (self.startup_debug, "--startup-debug"),
            (self.no_caps, "--no-caps"),
            (self.syntax_only, "--syntax-only"),
            (self.version, "--version"),
        ];
        let options = [
            ("--cfgfile", &self.config_path),
            ("--persist-file", &self.persist_path),
            ("--pidfile", &self.pid_path),
            ("--control", &self.control_socket_path),
            ("--preprocess-into", &self.preprocess_into),
        ];

        let mut params: Vec<OsString> = switches
            .iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, flag)| OsString::from(flag))
            .collect();
        params.extend(
            options
                .iter()
                .filter_map(|(key, value)| value.as_deref().map(|path| key_value(key, path))),
        );
        params
    }
}

fn key_value(key: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(format!("{}=", key));
    arg.push(path);
    arg
}
