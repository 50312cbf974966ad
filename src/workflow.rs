//! Workflow specification: one migration intent, immutable once built.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;
use crate::mode::Mode;

/// Handle to the engine's config file.
///
/// Keeps the path exactly as declared (that string is what gets baked, so
/// presets do not depend on where the checkout lives) alongside the
/// location that was checked for readability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigHandle {
    declared: String,
    location: PathBuf,
}

impl ConfigHandle {
    /// Resolves `declared` against `base_dir` and checks the file can be read.
    pub fn resolve(base_dir: &Path, declared: &str) -> Result<Self, ConfigError> {
        if declared.trim().is_empty() {
            return Err(ConfigError::EmptyConfigPath);
        }

        let location = base_dir.join(declared);
        let metadata = fs::metadata(&location).map_err(|source| ConfigError::ConfigResource {
            path: location.clone(),
            source,
        })?;
        if metadata.is_dir() {
            return Err(ConfigError::ConfigResource {
                path: location,
                source: std::io::Error::other("is a directory"),
            });
        }
        fs::File::open(&location).map_err(|source| ConfigError::ConfigResource {
            path: location.clone(),
            source,
        })?;

        Ok(Self {
            declared: declared.to_string(),
            location,
        })
    }

    /// The path string passed to the engine.
    pub fn as_arg(&self) -> &str {
        &self.declared
    }

    /// Where the file was found at evaluation time.
    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// Describes one migration target.
///
/// Built through [`WorkflowSpec::builder`]; the workflow name is guaranteed
/// non-empty. Validate-only targets never build one and use a bare
/// [`ConfigHandle`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSpec {
    config: ConfigHandle,
    workflow: String,
    force: bool,
    ignore_noop: bool,
    dry_run: bool,
}

impl WorkflowSpec {
    pub fn builder(config: ConfigHandle, workflow: impl Into<String>) -> WorkflowSpecBuilder {
        WorkflowSpecBuilder {
            config,
            workflow: workflow.into(),
            force: false,
            ignore_noop: false,
            dry_run: false,
        }
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn workflow(&self) -> &str {
        &self.workflow
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn ignore_noop(&self) -> bool {
        self.ignore_noop
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Mode used by fixed-mode targets.
    pub fn fixed_mode(&self) -> Mode {
        if self.dry_run {
            Mode::DryRun
        } else {
            Mode::Migrate
        }
    }

    /// True when `force` was requested but `mode` drops it.
    pub fn force_ignored(&self, mode: Mode) -> bool {
        self.force && mode == Mode::DryRun
    }
}

/// Named-field builder for [`WorkflowSpec`].
#[derive(Debug, Clone)]
pub struct WorkflowSpecBuilder {
    config: ConfigHandle,
    workflow: String,
    force: bool,
    ignore_noop: bool,
    dry_run: bool,
}

impl WorkflowSpecBuilder {
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn ignore_noop(mut self, ignore_noop: bool) -> Self {
        self.ignore_noop = ignore_noop;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Rejects an empty or blank workflow name.
    pub fn build(self) -> Result<WorkflowSpec, ConfigError> {
        if self.workflow.trim().is_empty() {
            return Err(ConfigError::EmptyWorkflow);
        }
        Ok(WorkflowSpec {
            config: self.config,
            workflow: self.workflow,
            force: self.force,
            ignore_noop: self.ignore_noop,
            dry_run: self.dry_run,
        })
    }
}
