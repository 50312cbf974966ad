//! Tests for the launch-time merge and dispatch.

mod common;

use common::{strings, RecordingRunner, Workspace};
use copywire::args::ArgumentList;
use copywire::launcher::{
    merge, resolve_engine, resolve_preset_path, EngineExit, LaunchError, Launcher,
    DEFAULT_ENGINE, EXIT_LAUNCH_FAILURE,
};
use copywire::stage;

fn presets(args: &[&str]) -> ArgumentList {
    ArgumentList::from(strings(args))
}

#[test]
fn merge_appends_trailing_after_presets() {
    let merged = merge(presets(&["migrate", "a.sky", "wf"]), strings(&["--force"]));
    assert_eq!(merged, ["migrate", "a.sky", "wf", "--force"]);
}

#[test]
fn merge_with_no_trailing_is_presets() {
    let merged = merge(presets(&["migrate", "a.sky", "wf"]), Vec::new());
    assert_eq!(merged, ["migrate", "a.sky", "wf"]);
}

#[test]
fn merge_keeps_duplicates_and_order() {
    let merged = merge(
        presets(&["migrate", "a.sky", "wf", "--force"]),
        strings(&["--force", "--last-rev", "abc", "--force"]),
    );
    assert_eq!(
        merged,
        ["migrate", "a.sky", "wf", "--force", "--force", "--last-rev", "abc", "--force"]
    );
}

#[test]
fn launch_dispatches_staged_preset_plus_trailing() {
    let ws = Workspace::new();
    let preset = ws.write("wf.args", "migrate\na.sky\nwf\n");
    let launcher = Launcher::new("copybara", RecordingRunner::exiting(EngineExit::Code(0)));

    let exit = launcher.launch(&preset, strings(&["--force"])).unwrap();

    assert_eq!(exit, EngineExit::Code(0));
    let calls = launcher.runner().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "copybara");
    assert_eq!(calls[0].args, ["migrate", "a.sky", "wf", "--force"]);
}

#[test]
fn engine_failure_is_returned_unchanged() {
    let ws = Workspace::new();
    let preset = ws.write("wf.args", "migrate\na.sky\nwf\n");
    let launcher = Launcher::new("copybara", RecordingRunner::exiting(EngineExit::Code(4)));

    let exit = launcher.launch(&preset, Vec::new()).unwrap();
    assert_eq!(exit.exit_code(), 4);
}

#[test]
fn missing_preset_fails_before_dispatch() {
    let ws = Workspace::new();
    let launcher = Launcher::new("copybara", RecordingRunner::exiting(EngineExit::Code(0)));

    let err = launcher
        .launch(&ws.path().join("absent.args"), strings(&["--force"]))
        .unwrap_err();

    assert!(matches!(err, LaunchError::PresetMissing { .. }));
    assert_eq!(err.exit_code(), EXIT_LAUNCH_FAILURE);
    assert!(launcher.runner().calls().is_empty());
}

#[test]
fn empty_preset_fails_before_dispatch() {
    let ws = Workspace::new();
    let preset = ws.write("empty.args", "");
    let launcher = Launcher::new("copybara", RecordingRunner::exiting(EngineExit::Code(0)));

    let err = launcher.launch(&preset, Vec::new()).unwrap_err();
    assert!(matches!(err, LaunchError::EmptyPreset { .. }));
    assert!(launcher.runner().calls().is_empty());
}

#[test]
fn staged_preset_reads_back_as_rendered() {
    let ws = Workspace::new();
    let args = presets(&["migrate", "--dry-run", "copy.bara.sky", "sync-docs"]);
    let path = stage::preset_path(ws.path(), "sync");
    stage::write_preset(&path, &stage::render(&args).unwrap()).unwrap();

    assert_eq!(stage::read_preset(&path).unwrap(), args);
}

#[test]
fn explicit_preset_path_wins() {
    let path = resolve_preset_path(Some("x.args".into())).unwrap();
    assert_eq!(path, std::path::PathBuf::from("x.args"));
}

#[test]
fn explicit_engine_wins() {
    assert_eq!(resolve_engine(Some("/opt/copybara".into())), "/opt/copybara");
    assert!(!DEFAULT_ENGINE.is_empty());
}

#[cfg(unix)]
#[test]
fn process_runner_reports_missing_engine() {
    use copywire::launcher::{ProcessRunner, EXIT_ENGINE_NOT_FOUND};

    let ws = Workspace::new();
    let preset = ws.write("wf.args", "migrate\na.sky\nwf\n");
    let launcher = Launcher::new(
        ws.path().join("no-such-engine").to_string_lossy().into_owned(),
        ProcessRunner,
    );

    let err = launcher.launch(&preset, Vec::new()).unwrap_err();
    assert!(matches!(err, LaunchError::EngineNotFound { .. }));
    assert_eq!(err.exit_code(), EXIT_ENGINE_NOT_FOUND);
}

#[cfg(unix)]
#[test]
fn process_runner_propagates_exit_code() {
    use copywire::launcher::ProcessRunner;

    let ws = Workspace::new();
    let engine = ws.write("exit3.sh", "#!/bin/sh\nexit 3\n");
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    let preset = ws.write("wf.args", "migrate\na.sky\nwf\n");
    let launcher = Launcher::new(engine.to_string_lossy().into_owned(), ProcessRunner);

    let exit = launcher.launch(&preset, Vec::new()).unwrap();
    assert_eq!(exit, EngineExit::Code(3));
}
