// src/core/core_files.rs

use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

lazy_static! {
    // `core` (kernel.core_uses_pid = 0) or `core.<pid>`.
    static ref CORE_FILE_NAME: Regex = Regex::new(r"^core(\.[0-9]+)?$")
        .unwrap_or_else(|_| unreachable!("core file pattern is a valid regex"));
}

/// `true` for `core` and `core.<pid>`.
pub fn is_core_file_name(name: &str) -> bool {
    CORE_FILE_NAME.is_match(name)
}

/// Lists the core dumps directly inside `dir`, sorted by file name.
pub fn find_core_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut cores = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_str().is_some_and(is_core_file_name) {
            cores.push(entry.path());
        }
    }
    cores.sort();
    log::debug!("Found {} core file(s) in '{}'", cores.len(), dir.display());
    Ok(cores)
}

/// Resolves a user-supplied location to the core files it designates: the path
/// itself when it is a file, or the core files inside it when it is a directory.
pub fn resolve_core_files(location: &Path) -> io::Result<Vec<PathBuf>> {
    if location.is_dir() {
        find_core_files(location)
    } else if location.is_file() {
        Ok(vec![location.to_path_buf()])
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("'{}' is neither a core file nor a directory", location.display()),
        ))
    }
}
