// src/core/commands.rs
//
// Pure argv construction. Nothing here touches the filesystem or spawns anything,
// so every launch mode can be inspected (and tested) before it runs. Arguments
// are `OsString`s so paths reach the child byte for byte.

use crate::{
    constants::{STRACE_ARGS, VALGRIND_ARGS},
    core::start_params::StartParams,
    models::ToolsConfig,
};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use thiserror::Error;

/// A command line that cannot be rendered for a shell.
#[derive(Error, Debug)]
pub enum CommandBuildError {
    /// The argument contains a NUL byte, which no shell word can hold.
    #[error("Argument '{0}' cannot be quoted for a shell (it contains a NUL byte).")]
    Unquotable(String),
    /// The argument is not representable on this platform's shell.
    #[error("Argument '{0}' is not valid text and cannot be passed through a shell here.")]
    NotText(String),
}

fn path_arg(path: &Path) -> OsString {
    path.as_os_str().to_os_string()
}

fn text_args(args: &[&str]) -> impl Iterator<Item = OsString> {
    args.iter().map(OsString::from)
}

/// `<binary> <params...>`
pub fn daemon_command(binary: &Path, params: &StartParams) -> Vec<OsString> {
    let mut command = vec![path_arg(binary)];
    command.extend(params.format());
    command
}

/// `valgrind <memcheck options> --log-file=<log> <binary> <params...>`
pub fn valgrind_command(
    tools: &ToolsConfig,
    binary: &Path,
    params: &StartParams,
    valgrind_output_path: &Path,
) -> Vec<OsString> {
    let mut command = vec![path_arg(&tools.valgrind)];
    command.extend(text_args(VALGRIND_ARGS));
    let mut log_file = OsString::from("--log-file=");
    log_file.push(valgrind_output_path);
    command.push(log_file);
    command.extend(daemon_command(binary, params));
    command
}

/// `strace -s 4096 -tt -T -ff -o <out> <binary> <params...>`
pub fn strace_command(
    tools: &ToolsConfig,
    binary: &Path,
    params: &StartParams,
    strace_output_path: &Path,
) -> Vec<OsString> {
    let mut command = vec![path_arg(&tools.strace)];
    command.extend(text_args(STRACE_ARGS));
    command.push(OsString::from("-o"));
    command.push(path_arg(strace_output_path));
    command.extend(daemon_command(binary, params));
    command
}

/// Interactive gdb in its own terminal window.
///
/// gdb's `run` command goes through a shell, which is what performs the
/// redirections, so the daemon's arguments and the output paths are quoted for
/// that shell. The gdb invocation is then quoted once more because `xterm -e`
/// receives it as a single string.
pub fn gdb_command(
    tools: &ToolsConfig,
    binary: &Path,
    params: &StartParams,
    stdout_path: &Path,
    stderr_path: &Path,
) -> Result<Vec<OsString>, CommandBuildError> {
    let mut run_line = b"r ".to_vec();
    run_line.extend(join_bytes(&params.format())?);
    run_line.extend_from_slice(b" > ");
    run_line.extend(quote_bytes(stdout_path.as_os_str())?);
    run_line.extend_from_slice(b" 2> ");
    run_line.extend(quote_bytes(stderr_path.as_os_str())?);

    let gdb_args = vec![
        path_arg(&tools.gdb),
        OsString::from("-ex"),
        os_string_from_bytes(run_line)?,
        path_arg(binary),
    ];

    Ok(vec![
        path_arg(&tools.xterm),
        OsString::from("-fa"),
        OsString::from(&tools.xterm_font),
        OsString::from("-fs"),
        OsString::from(tools.xterm_font_size.to_string()),
        OsString::from("-e"),
        shell_join(&gdb_args)?,
    ])
}

/// `gdb -ex "bt full" --batch <binary> --core <core>`
pub fn backtrace_command(tools: &ToolsConfig, binary: &Path, core_file_path: &Path) -> Vec<OsString> {
    vec![
        path_arg(&tools.gdb),
        OsString::from("-ex"),
        OsString::from("bt full"),
        OsString::from("--batch"),
        path_arg(binary),
        OsString::from("--core"),
        path_arg(core_file_path),
    ]
}

/// Joins arguments into a single POSIX shell command line, keeping their bytes.
pub fn shell_join(args: &[OsString]) -> Result<OsString, CommandBuildError> {
    os_string_from_bytes(join_bytes(args)?)
}

fn join_bytes(args: &[OsString]) -> Result<Vec<u8>, CommandBuildError> {
    shlex::bytes::try_join(args.iter().map(|arg| arg.as_encoded_bytes()))
        .map_err(|_| CommandBuildError::Unquotable(lossy_join(args)))
}

fn quote_bytes(arg: &OsStr) -> Result<Vec<u8>, CommandBuildError> {
    shlex::bytes::try_quote(arg.as_encoded_bytes())
        .map(|quoted| quoted.into_owned())
        .map_err(|_| CommandBuildError::Unquotable(arg.to_string_lossy().into_owned()))
}

fn lossy_join(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(unix)]
#[allow(clippy::unnecessary_wraps)]
fn os_string_from_bytes(bytes: Vec<u8>) -> Result<OsString, CommandBuildError> {
    use std::os::unix::ffi::OsStringExt;
    Ok(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn os_string_from_bytes(bytes: Vec<u8>) -> Result<OsString, CommandBuildError> {
    String::from_utf8(bytes)
        .map(OsString::from)
        .map_err(|e| CommandBuildError::NotText(String::from_utf8_lossy(e.as_bytes()).into_owned()))
}
