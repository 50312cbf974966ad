use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::mode::ModeFlag;

/// Root of a `copywire.toml` target file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetFile {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Declared targets, in file order.
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetDef>,
    /// Directory the file was loaded from; config paths resolve against it.
    #[serde(skip)]
    pub(crate) base_dir: PathBuf,
}

/// How to reach the migration engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Executable name or path (default: "copybara").
    #[serde(default = "default_engine_program")]
    pub program: String,
}

/// What a target produces when evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Fixed-mode migration; mode comes from `dry_run`.
    Migrate,
    /// Mode chosen by a build-time flag.
    Switchable,
    /// Only runs `validate`; never baked.
    Validate,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Migrate => "migrate",
            Self::Switchable => "switchable",
            Self::Validate => "validate",
        }
    }
}

/// One declared target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDef {
    /// Unique name; also the stem of staged files.
    pub name: String,
    pub kind: TargetKind,
    /// Engine config file, relative to the target file.
    pub config: String,
    /// Workflow inside the engine config. Required unless `kind = "validate"`.
    #[serde(default)]
    pub workflow: Option<String>,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub ignore_noop: bool,
    #[serde(default)]
    pub dry_run: bool,
    /// Opaque execution tags (e.g. "requires-network").
    #[serde(default)]
    pub tags: Vec<String>,
    /// Build-time mode switch. Required for switchable targets only.
    #[serde(default)]
    pub mode_flag: Option<ModeFlag>,
}

fn default_engine_program() -> String {
    "copybara".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: default_engine_program(),
        }
    }
}

impl TargetFile {
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
