// src/core/paths.rs

use crate::constants::{APP_CONFIG_DIRNAME, CONFIG_ENV_VAR, CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref APP_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Failures while locating or expanding paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform reports no per-user config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// A `~` or `$VAR` reference could not be resolved.
    #[error("Failed to expand path template '{template}': {reason}")]
    Expansion {
        /// The path as written.
        template: String,
        /// What shellexpand reported.
        reason: String,
    },
}

/// Returns the directory that holds `launcher.toml` (`~/.config/sng-launch`).
///
/// Memoized: the first call computes the path, later calls return the cached
/// value. Unlike the output directory, this one is never created here; a missing
/// config file simply means built-in defaults.
pub fn get_app_config_dir() -> Result<PathBuf, PathError> {
    // A poisoned lock only means another thread panicked mid-lookup; the cached value is still usable.
    let mut cached = APP_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_CONFIG_DIRNAME);
    *cached = Some(config_path.clone());
    Ok(config_path)
}

/// Decides which configuration file to read.
///
/// Priority: the explicit path, then `$SNG_LAUNCH_CONFIG`, then the default
/// location. The boolean is `true` when the path was requested explicitly, in
/// which case a missing file is an error rather than a silent fallback.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<(PathBuf, bool), PathError> {
    if let Some(path) = explicit {
        return Ok((expand_path(path)?, true));
    }
    if let Some(from_env) = env::var_os(CONFIG_ENV_VAR)
        && !from_env.to_string_lossy().trim().is_empty()
    {
        return Ok((expand_path(Path::new(&from_env))?, true));
    }
    Ok((get_app_config_dir()?.join(CONFIG_FILENAME), false))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a path and
/// strips Windows verbatim prefixes.
///
/// A path that is not valid UTF-8 cannot hold a template and is returned with
/// its bytes untouched.
pub fn expand_path(template: &Path) -> Result<PathBuf, PathError> {
    let Some(text) = template.to_str() else {
        return Ok(dunce::simplified(template).to_path_buf());
    };
    let expanded = shellexpand::full(text).map_err(|e| PathError::Expansion {
        template: text.to_string(),
        reason: e.to_string(),
    })?;
    let path = PathBuf::from(expanded.into_owned());
    Ok(dunce::simplified(&path).to_path_buf())
}
