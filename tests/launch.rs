// tests/launch.rs
//
// Drives DaemonExecutor against real processes. A small shell script stands in
// for syslog-ng and echoes the arguments it received.
#![cfg(unix)]

use sng_launch::{
    core::{daemon_executor::DaemonExecutor, start_params::StartParams},
    models::ToolsConfig,
    system::{CommandExecutor, ProcessExecutor},
};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn fake_daemon(dir: &TempDir) -> PathBuf {
    write_script(
        dir.path(),
        "fake-syslog-ng",
        r#"for arg in "$@"; do echo "$arg"; done
echo "fake daemon stderr" >&2"#,
    )
}

fn executor_for(binary: PathBuf, tools: ToolsConfig) -> DaemonExecutor {
    DaemonExecutor::with_executors(
        binary,
        tools,
        ProcessExecutor::new(),
        CommandExecutor::new(Arc::new(AtomicBool::new(false))),
    )
}

#[test]
fn run_process_passes_formatted_params() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor_for(fake_daemon(&dir), ToolsConfig::default());
    let params = StartParams::bare()
        .with_config_path(dir.path().join("syslog ng.conf"))
        .with_control_socket_path(dir.path().join("ctl"));
    let stdout = dir.path().join("out");
    let stderr = dir.path().join("err");

    let mut process = executor.run_process(&params, &stderr, &stdout).unwrap();
    assert!(process.wait().unwrap().success());

    let received: Vec<OsString> = fs::read_to_string(&stdout)
        .unwrap()
        .lines()
        .map(OsString::from)
        .collect();
    assert_eq!(received, params.format());
    assert_eq!(fs::read_to_string(&stderr).unwrap(), "fake daemon stderr\n");
}

#[test]
fn non_utf8_paths_reach_the_daemon_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor_for(fake_daemon(&dir), ToolsConfig::default());
    let params = StartParams::bare().with_config_path(OsStr::from_bytes(b"/tmp/sng-\xff.conf"));
    let stdout = dir.path().join("out");

    let mut process = executor.run_process(&params, &dir.path().join("err"), &stdout).unwrap();
    assert!(process.wait().unwrap().success());
    assert_eq!(fs::read(&stdout).unwrap(), b"--cfgfile=/tmp/sng-\xff.conf\n".to_vec());
    assert_eq!(process.command()[1].as_bytes(), b"--cfgfile=/tmp/sng-\xff.conf");
}

#[test]
fn wrappers_put_their_options_before_the_daemon() {
    let dir = tempfile::tempdir().unwrap();
    let binary = fake_daemon(&dir);
    // A wrapper that prints its whole argv, like valgrind would see it.
    let echo_tool = write_script(dir.path(), "echo-tool", r#"for arg in "$@"; do echo "$arg"; done"#);
    let tools = ToolsConfig {
        valgrind: echo_tool.clone(),
        strace: echo_tool,
        ..ToolsConfig::default()
    };
    let executor = executor_for(binary.clone(), tools);
    let params = StartParams::bare().with_pid_path("/t/sng.pid");

    let vg_out = dir.path().join("vg_out");
    let mut process = executor
        .run_process_with_valgrind(&params, &dir.path().join("vg_err"), &vg_out, Path::new("/t/vg.log"))
        .unwrap();
    process.wait().unwrap();
    let seen = fs::read_to_string(&vg_out).unwrap();
    let seen: Vec<&str> = seen.lines().collect();
    assert_eq!(seen.first(), Some(&"--show-leak-kinds=all"));
    assert!(seen.contains(&"--log-file=/t/vg.log"));
    assert_eq!(
        seen[seen.len() - 2..],
        [binary.to_str().unwrap(), "--pidfile=/t/sng.pid"]
    );

    let st_out = dir.path().join("st_out");
    let mut process = executor
        .run_process_with_strace(&params, &dir.path().join("st_err"), &st_out, Path::new("/t/trace"))
        .unwrap();
    process.wait().unwrap();
    let seen = fs::read_to_string(&st_out).unwrap();
    let seen: Vec<&str> = seen.lines().collect();
    assert_eq!(
        seen,
        vec![
            "-s",
            "4096",
            "-tt",
            "-T",
            "-ff",
            "-o",
            "/t/trace",
            binary.to_str().unwrap(),
            "--pidfile=/t/sng.pid",
        ]
    );
}

#[test]
fn backtrace_runs_gdb_batch_and_returns_output() {
    let dir = tempfile::tempdir().unwrap();
    let binary = fake_daemon(&dir);
    let fake_gdb = write_script(
        dir.path(),
        "fake-gdb",
        r##"echo "#0  0x00007f in raise () from /lib/libc.so.6"
echo "args: $*"
echo "no debugging symbols found" >&2
exit 1"##,
    );
    let tools = ToolsConfig {
        gdb: fake_gdb,
        ..ToolsConfig::default()
    };
    let executor = executor_for(binary.clone(), tools);
    let core = dir.path().join("core.1234");
    fs::write(&core, b"").unwrap();

    let output = executor
        .get_backtrace_from_core(&core, &dir.path().join("bt_err"), &dir.path().join("bt_out"))
        .unwrap();

    // A failing gdb still yields its output.
    assert_eq!(output.exit_code, Some(1));
    assert!(output.stdout.starts_with("#0  0x00007f in raise ()"));
    assert!(output.stdout.contains(&format!(
        "args: -ex bt full --batch {} --core {}",
        binary.display(),
        core.display()
    )));
    assert_eq!(output.stderr, "no debugging symbols found\n");
}

#[test]
fn missing_binary_is_reported_not_panicked() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor_for(dir.path().join("does-not-exist"), ToolsConfig::default());
    let out = dir.path().join("out");

    let result = executor.run_process(&StartParams::default(), &out, &out);
    assert!(result.is_err());
}
