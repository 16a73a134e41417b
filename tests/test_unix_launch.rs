//! End-to-end launch tests against a stub interpreter.
//!
//! The stub is a shell script standing in for PowerShell. It records the argv
//! it was given and a copy of the script it was asked to run, then exits with
//! a fixed status. This exercises extraction, command assembly, `StdSpawner`,
//! supervision, and cleanup with real processes and real files.

#![cfg(unix)]

use std::ffi::OsStr;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pslaunch::{BundledResource, ExitCode, LaunchConfig, LifecycleState, StdSpawner, launch_in};
use tempfile::TempDir;

/// Serializes stub creation and launch. Writing an executable while another
/// thread forks can fail the exec with ETXTBSY.
static LAUNCH_LOCK: Mutex<()> = Mutex::new(());

const PAYLOAD: &[u8] = b"param($Name)\r\nWrite-Output \"hello $Name\"\r\nexit 7\r\n";

struct Fixture {
    _root: TempDir,
    temp: PathBuf,
    record: PathBuf,
    stub: PathBuf,
}

impl Fixture {
    /// Stub interpreter that records its inputs and then runs `tail`.
    fn new(tail: &str) -> Self {
        let root = TempDir::new().unwrap();
        let temp = root.path().join("temp");
        let record = root.path().join("record");
        fs::create_dir(&temp).unwrap();
        fs::create_dir(&record).unwrap();

        let stub = root.path().join("pwsh");
        let body = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$@\" > '{record}/argv'\n\
             script=$(printf '%s' \"$5\" | sed -n \"s/^.*; & '\\([^']*\\)' .*$/\\1/p\")\n\
             cp \"$script\" '{record}/seen.ps1'\n\
             {tail}\n",
            record = record.display(),
        );
        fs::write(&stub, body).unwrap();
        fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            _root: root,
            temp,
            record,
            stub,
        }
    }

    fn config(&self) -> LaunchConfig {
        LaunchConfig::default().with_interpreter(&self.stub)
    }

    fn recorded(&self, name: &str) -> Vec<u8> {
        fs::read(self.record.join(name)).unwrap()
    }

    fn temp_is_empty(&self) -> bool {
        fs::read_dir(&self.temp).unwrap().next().is_none()
    }
}

fn run(fixture: &Fixture, forwarded: &str) -> pslaunch::RunReport {
    let _guard = LAUNCH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let source = BundledResource::new(101, PAYLOAD);
    launch_in(
        StdSpawner,
        &source,
        &fixture.temp,
        &fixture.config(),
        OsStr::new(forwarded),
    )
    .unwrap()
}

#[test]
fn test_exit_code_passthrough_and_cleanup() {
    let fixture = Fixture::new("exit 7");

    let report = run(&fixture, "-Name world");

    assert_eq!(report.state, LifecycleState::Exited(7));
    assert_eq!(report.exit_code(), ExitCode::from(7));
    assert_eq!(
        report.transitions,
        vec![
            LifecycleState::Created,
            LifecycleState::Running,
            LifecycleState::Exited(7)
        ]
    );
    assert!(!report.script_path.exists());
    assert!(fixture.temp_is_empty());
}

#[test]
fn test_interpreter_sees_exact_payload() {
    let fixture = Fixture::new("exit 0");

    let report = run(&fixture, "");

    assert_eq!(report.exit_code(), ExitCode::SUCCESS);
    assert_eq!(fixture.recorded("seen.ps1"), PAYLOAD);
    assert!(fixture.temp_is_empty());
}

#[test]
fn test_script_name_shape() {
    let fixture = Fixture::new("exit 0");

    let report = run(&fixture, "");

    let name = report.script_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("ldo"), "unexpected name {name}");
    assert!(name.ends_with(".ps1"), "unexpected name {name}");
    assert_eq!(report.script_path.parent(), Some(fixture.temp.as_path()));
}

#[test]
fn test_interpreter_argv() {
    let fixture = Fixture::new("exit 0");

    let report = run(&fixture, "-Name 'a  b' -Flag");

    let argv = String::from_utf8(fixture.recorded("argv")).unwrap();
    let lines: Vec<&str> = argv.lines().collect();
    assert_eq!(&lines[..4], ["-ExecutionPolicy", "Bypass", "-NoProfile", "-Command"]);
    assert_eq!(lines.len(), 5);
    let expected = format!(
        "& {{ $ErrorActionPreference = 'Stop'; & '{}' -Name 'a  b' -Flag; exit $LASTEXITCODE }}",
        report.script_path.display()
    );
    assert_eq!(lines[4], expected);
}

#[test]
fn test_signal_termination_maps_to_shell_status() {
    let fixture = Fixture::new("kill -9 $$");

    let report = run(&fixture, "");

    assert_eq!(report.state, LifecycleState::Exited(137));
    assert!(fixture.temp_is_empty());
}

#[test]
fn test_missing_interpreter_cleans_up() {
    let fixture = Fixture::new("exit 0");
    let config = fixture.config().with_interpreter(Path::new("/nonexistent/pslaunch/pwsh"));
    let source = BundledResource::new(101, PAYLOAD);

    let report = {
        let _guard = LAUNCH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        launch_in(StdSpawner, &source, &fixture.temp, &config, OsStr::new("")).unwrap()
    };

    assert_eq!(report.state, LifecycleState::LaunchFailed(2));
    assert_eq!(report.exit_code(), ExitCode::from(2));
    assert_eq!(
        report.transitions,
        vec![LifecycleState::Created, LifecycleState::LaunchFailed(2)]
    );
    assert!(report.failure.is_some());
    assert!(fixture.temp_is_empty());
}

#[test]
fn test_missing_temp_dir_fails_before_launch() {
    let fixture = Fixture::new("exit 0");
    let source = BundledResource::new(101, PAYLOAD);
    let missing = fixture.temp.join("gone");

    let err = launch_in(StdSpawner, &source, &missing, &fixture.config(), OsStr::new(""))
        .unwrap_err();

    assert!(matches!(err, pslaunch::LauncherError::TempCreateFailed { .. }));
    assert!(!fixture.record.join("argv").exists());
}
