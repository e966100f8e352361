// src/cli/args.rs
use crate::core::start_params::StartParams;
use clap::Args;
use std::path::PathBuf;

/// Options shared by every command that launches or inspects syslog-ng.
#[derive(Args, Debug, Default, Clone)]
pub struct LaunchArgs {
    /// Path to launcher.toml. Defaults to $SNG_LAUNCH_CONFIG, then ~/.config/sng-launch/launcher.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The syslog-ng binary to run. Overrides `binary` from the config file.
    #[arg(long, short)]
    pub binary: Option<PathBuf>,

    /// Directory for captured output and tool logs. Overrides `output_dir`.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Start parameter overrides.
    #[command(flatten)]
    pub params: StartParamArgs,
}

/// Overrides for the start parameters from the config file.
///
/// Every switch that is on by default has a `--no-*` form; the others can only
/// be turned on.
#[derive(Args, Debug, Default, Clone)]
pub struct StartParamArgs {
    /// Configuration file passed as --cfgfile.
    #[arg(long, value_name = "FILE")]
    pub cfgfile: Option<PathBuf>,

    /// Persist file passed as --persist-file.
    #[arg(long, value_name = "FILE")]
    pub persist_file: Option<PathBuf>,

    /// PID file passed as --pidfile.
    #[arg(long, value_name = "FILE")]
    pub pidfile: Option<PathBuf>,

    /// Control socket passed as --control.
    #[arg(long, value_name = "SOCKET")]
    pub control: Option<PathBuf>,

    /// Target passed as --preprocess-into.
    #[arg(long, value_name = "FILE")]
    pub preprocess_into: Option<PathBuf>,

    /// Only check the configuration syntax.
    #[arg(long)]
    pub syntax_only: bool,

    /// Ask syslog-ng for its version.
    #[arg(long)]
    pub version: bool,

    /// Drop --foreground.
    #[arg(long)]
    pub no_foreground: bool,
    /// Drop --enable-core.
    #[arg(long)]
    pub no_enable_core: bool,
    /// Drop --stderr.
    #[arg(long)]
    pub no_stderr: bool,
    /// Drop --debug.
    #[arg(long)]
    pub no_debug: bool,
    /// Drop --trace.
    #[arg(long)]
    pub no_trace: bool,
    /// Drop --verbose.
    #[arg(long)]
    pub no_verbose: bool,
    /// Drop --startup-debug.
    #[arg(long)]
    pub no_startup_debug: bool,
    /// Drop --no-caps.
    #[arg(long)]
    pub no_no_caps: bool,

    /// Turn off every switch that is on by default.
    #[arg(long)]
    pub quiet: bool,
}

impl StartParamArgs {
    /// Layers the command-line overrides on top of `base`.
    pub fn apply(&self, base: StartParams) -> StartParams {
        let mut params = if self.quiet {
            StartParams {
                syntax_only: base.syntax_only,
                version: base.version,
                config_path: base.config_path,
                persist_path: base.persist_path,
                pid_path: base.pid_path,
                control_socket_path: base.control_socket_path,
                preprocess_into: base.preprocess_into,
                ..StartParams::bare()
            }
        } else {
            base
        };

        for (off, switch) in [
            (self.no_foreground, &mut params.foreground),
            (self.no_enable_core, &mut params.enable_core),
            (self.no_stderr, &mut params.stderr),
            (self.no_debug, &mut params.debug),
            (self.no_trace, &mut params.trace),
            (self.no_verbose, &mut params.verbose),
            (self.no_startup_debug, &mut params.startup_debug),
            (self.no_no_caps, &mut params.no_caps),
        ] {
            if off {
                *switch = false;
            }
        }
        params.syntax_only |= self.syntax_only;
        params.version |= self.version;

        for (value, slot) in [
            (&self.cfgfile, &mut params.config_path),
            (&self.persist_file, &mut params.persist_path),
            (&self.pidfile, &mut params.pid_path),
            (&self.control, &mut params.control_socket_path),
            (&self.preprocess_into, &mut params.preprocess_into),
        ] {
            if let Some(path) = value {
                *slot = Some(path.clone());
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    #[command(no_binary_name = true)]
    struct Harness {
        #[command(flatten)]
        launch: LaunchArgs,
    }

    fn parse(args: &[&str]) -> LaunchArgs {
        Harness::try_parse_from(args).unwrap().launch
    }

    #[test]
    fn test_no_overrides_keeps_base() {
        let args = parse(&[]);
        assert_eq!(args.params.apply(StartParams::default()), StartParams::default());
    }

    #[test]
    fn test_switch_and_path_overrides() {
        let args = parse(&["--no-trace", "--syntax-only", "--cfgfile", "/t/sng.conf"]);
        let params = args.params.apply(StartParams::default());

        assert!(!params.trace);
        assert!(params.debug);
        assert!(params.syntax_only);
        assert_eq!(params.config_path, Some(PathBuf::from("/t/sng.conf")));
    }

    #[test]
    fn test_quiet_keeps_paths_but_drops_switches() {
        let args = parse(&["--quiet", "--version"]);
        let base = StartParams::default().with_pid_path("/t/sng.pid");
        let params = args.params.apply(base);

        assert_eq!(params.format(), vec!["--version", "--pidfile=/t/sng.pid"]);
    }

    #[test]
    fn test_no_no_caps_drops_the_no_caps_switch() {
        let args = parse(&["--no-no-caps"]);
        let params = args.params.apply(StartParams::default());
        assert!(!params.no_caps);
        assert!(params.foreground);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_flag_keeps_its_bytes() {
        use std::ffi::{OsStr, OsString};
        use std::os::unix::ffi::OsStrExt;

        let args = Harness::try_parse_from([
            OsString::from("--cfgfile"),
            OsStr::from_bytes(b"/tmp/sng-\xff.conf").to_os_string(),
        ])
        .unwrap()
        .launch;
        let params = args.params.apply(StartParams::bare());
        assert_eq!(params.format()[0].as_bytes(), b"--cfgfile=/tmp/sng-\xff.conf");
    }

    #[test]
    fn test_shared_options() {
        let args = parse(&["-b", "/opt/sng/syslog-ng", "--out-dir", "/t/out"]);
        assert_eq!(args.binary, Some(PathBuf::from("/opt/sng/syslog-ng")));
        assert_eq!(args.out_dir, Some(PathBuf::from("/t/out")));
        assert!(args.config.is_none());
    }
}
