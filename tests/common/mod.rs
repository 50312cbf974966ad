//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use copywire::config::TargetFile;
use copywire::launcher::{EngineExit, EngineRunner, Invocation, LaunchError};
use copywire::workflow::{ConfigHandle, WorkflowSpec};
use tempfile::TempDir;

/// Temp directory holding a `copy.bara.sky` and whatever else a test writes.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("copy.bara.sky"), "core.workflow(name = \"sync-docs\")\n")
            .expect("Failed to write engine config");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn config(&self) -> ConfigHandle {
        ConfigHandle::resolve(self.path(), "copy.bara.sky").expect("config should resolve")
    }

    pub fn targets(&self, toml: &str) -> TargetFile {
        TargetFile::from_toml(toml, self.path()).expect("target file should parse")
    }

    /// Writes an executable fake engine that prints one argument per line
    /// and exits with `$FAKE_ENGINE_EXIT` (default 0).
    #[cfg(unix)]
    pub fn fake_engine(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write(
            "fake-engine.sh",
            "#!/bin/sh\nfor arg in \"$@\"; do printf '%s\\n' \"$arg\"; done\nexit \"${FAKE_ENGINE_EXIT:-0}\"\n",
        );
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake engine executable");
        path
    }
}

/// Spec for the `sync-docs` workflow with the given flags.
pub fn spec(ws: &Workspace, force: bool, ignore_noop: bool, dry_run: bool) -> WorkflowSpec {
    WorkflowSpec::builder(ws.config(), "sync-docs")
        .force(force)
        .ignore_noop(ignore_noop)
        .dry_run(dry_run)
        .build()
        .expect("spec should build")
}

pub fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Records invocations instead of spawning anything.
pub struct RecordingRunner {
    exit: EngineExit,
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn exiting(exit: EngineExit) -> Self {
        Self {
            exit,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl EngineRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<EngineExit, LaunchError> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(self.exit)
    }
}
