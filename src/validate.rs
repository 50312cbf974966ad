//! Validation gate: `validate <config>` against the engine, independent of
//! any mode. Success leaves an [`InfoProvider`] record behind; failure
//! leaves nothing, and a missing record means "not validated".

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::args::{validate_preset, ArgumentList};
use crate::launcher::{EngineExit, EngineRunner, Invocation, LaunchError};
use crate::stage::info_path;
use crate::workflow::ConfigHandle;

/// Record handed to consumers of a validated config. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoProvider {
    /// Config path as passed to the engine.
    pub config: String,
    pub validated: bool,
}

/// Result of running the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Validated(InfoProvider),
    /// Engine refused the config; no record is produced.
    Rejected(EngineExit),
}

/// Builds and runs the validate action for one config.
#[derive(Debug, Clone)]
pub struct ValidationGate {
    config: ConfigHandle,
    tags: Vec<String>,
}

impl ValidationGate {
    pub fn new(config: ConfigHandle) -> Self {
        Self {
            config,
            tags: Vec::new(),
        }
    }

    /// Execution tags, e.g. "requires-network". Logged, otherwise opaque.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn args(&self) -> ArgumentList {
        validate_preset(&self.config)
    }

    pub fn run<R>(&self, engine: &str, runner: &R) -> Result<GateOutcome, LaunchError>
    where
        R: EngineRunner + ?Sized,
    {
        if !self.tags.is_empty() {
            tracing::info!(config = self.config.as_arg(), tags = ?self.tags, "validation tags");
        }

        let invocation = Invocation {
            program: engine.to_string(),
            args: self.args().into_vec(),
        };
        let exit = runner.run(&invocation)?;

        if exit.success() {
            Ok(GateOutcome::Validated(InfoProvider {
                config: self.config.as_arg().to_string(),
                validated: true,
            }))
        } else {
            tracing::warn!(config = self.config.as_arg(), ?exit, "validation rejected");
            Ok(GateOutcome::Rejected(exit))
        }
    }
}

/// Persist the outcome for `target` under `out_dir`.
///
/// A rejection removes any record left by an earlier successful run.
pub fn record_outcome(out_dir: &Path, target: &str, outcome: &GateOutcome) -> io::Result<()> {
    match outcome {
        GateOutcome::Validated(info) => {
            fs::create_dir_all(out_dir)?;
            let json = serde_json::to_string_pretty(info)?;
            fs::write(info_path(out_dir, target), json)
        }
        GateOutcome::Rejected(_) => remove_info(out_dir, target).map(|_| ()),
    }
}

/// Drop the record for `target`, if any. Returns whether a file was removed.
///
/// Every path that ends without a fresh validation goes through here, so a
/// record never outlives the run that could have refuted it.
pub fn remove_info(out_dir: &Path, target: &str) -> io::Result<bool> {
    match fs::remove_file(info_path(out_dir, target)) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Load the record for `target`. `None` means not validated.
pub fn read_info(out_dir: &Path, target: &str) -> io::Result<Option<InfoProvider>> {
    let path = info_path(out_dir, target);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let info: InfoProvider = serde_json::from_str(&content)?;
    Ok(Some(info))
}
