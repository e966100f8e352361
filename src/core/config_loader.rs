//! # Config Loader
//!
//! Reads `launcher.toml` and normalizes every path in it. A missing file at the
//! default location is not an error: the built-in defaults reproduce the
//! standard functional-test setup.
use crate::{
    core::paths::{self, PathError},
    models::LauncherConfig,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Failures while loading `launcher.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Could not read config file '{path}': {source}")]
    Read {
        /// The config file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`LauncherConfig`].
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// The config file.
        path: PathBuf,
        /// What the TOML parser reported.
        #[source]
        source: toml::de::Error,
    },
    /// An explicitly requested file is missing.
    #[error("Config file '{0}' does not exist.")]
    NotFound(PathBuf),
    /// A path in the file could not be expanded.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Loads the launcher configuration.
///
/// See [`paths::resolve_config_path`] for how the file is located.
pub fn load(explicit: Option<&Path>) -> Result<LauncherConfig, ConfigError> {
    let (path, explicit) = paths::resolve_config_path(explicit)?;

    if !path.exists() {
        if explicit {
            return Err(ConfigError::NotFound(path));
        }
        log::debug!(
            "No config file at '{}'. Using built-in defaults.",
            path.display()
        );
        return Ok(LauncherConfig::default());
    }

    log::debug!("Loading config from '{}'", path.display());
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    parse(&content, &path)
}

/// Parses config text and expands the paths it contains.
pub fn parse(content: &str, origin: &Path) -> Result<LauncherConfig, ConfigError> {
    let mut config: LauncherConfig =
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
    expand_paths(&mut config)?;
    Ok(config)
}

fn expand_paths(config: &mut LauncherConfig) -> Result<(), PathError> {
    config.binary = expand(&config.binary)?;
    config.output_dir = expand(&config.output_dir)?;

    let tools = &mut config.tools;
    for tool in [
        &mut tools.valgrind,
        &mut tools.gdb,
        &mut tools.strace,
        &mut tools.xterm,
    ] {
        *tool = expand(tool)?;
    }

    let params = &mut config.start_params;
    for path in [
        &mut params.config_path,
        &mut params.persist_path,
        &mut params.pid_path,
        &mut params.control_socket_path,
        &mut params.preprocess_into,
    ]
    .into_iter()
    .flatten()
    {
        *path = expand(path)?;
    }
    Ok(())
}

fn expand(path: &Path) -> Result<PathBuf, PathError> {
    paths::expand_path(path)
}
