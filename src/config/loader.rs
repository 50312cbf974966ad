use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::{TargetDef, TargetFile};

/// Errors raised while evaluating target declarations.
///
/// Every variant is reported before any engine process runs. An error tied
/// to one target fails only that target.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read target file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse target file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Target file validation failed: {message}")]
    ValidationError { message: String },

    #[error("Target '{name}' is not declared in the target file")]
    UnknownTarget { name: String },

    #[error("Config path must not be empty")]
    EmptyConfigPath,

    #[error("Config resource '{path}' is not readable: {source}")]
    ConfigResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Workflow name must not be empty")]
    EmptyWorkflow,

    #[error("Target '{target}' needs a workflow name to migrate")]
    MissingWorkflow { target: String },

    #[error("Target '{target}' is switchable but declares no mode flag")]
    MissingModeFlag { target: String },

    #[error("Target '{target}' declares a mode flag but is not switchable")]
    MisplacedModeFlag { target: String },

    #[error("Mode flag '{flag}' has value '{value}', expected one of: migrate, dry-run")]
    ModeOutOfDomain { flag: String, value: String },

    #[error("Malformed define '{define}', expected NAME=VALUE")]
    MalformedDefine { define: String },

    #[error("Argument {argument:?} contains a line break and cannot be staged")]
    UnstageableArgument { argument: String },
}

impl TargetFile {
    /// Conventional file name, looked up in the current directory.
    pub const DEFAULT_FILE_NAME: &'static str = "copywire.toml";

    /// Loads and validates a target file.
    ///
    /// Relative config paths inside the file resolve against the file's
    /// own directory.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut file: TargetFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        file.base_dir = base_dir;

        file.validate()?;
        Ok(file)
    }

    /// Parses a target file from a string, resolving paths against `base_dir`.
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut file: TargetFile = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: base_dir.join(Self::DEFAULT_FILE_NAME),
            source: e,
        })?;
        file.base_dir = base_dir.to_path_buf();
        file.validate()?;
        Ok(file)
    }

    /// Validates whole-file invariants.
    ///
    /// Checks:
    /// - The engine program is not empty
    /// - Target names are non-empty, file-name safe and unique
    /// - Mode flag names are unique across all targets
    ///
    /// Per-target problems (missing workflow, unreadable config) are left to
    /// evaluation so that sibling targets still evaluate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.program.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "engine.program must not be empty".to_string(),
            });
        }

        let mut names = HashSet::new();
        let mut flags = HashSet::new();
        for target in &self.targets {
            if !is_valid_target_name(&target.name) {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Target name '{}' must be non-empty and use only letters, digits, '-', '_' or '.'",
                        target.name
                    ),
                });
            }
            if !names.insert(target.name.as_str()) {
                return Err(ConfigError::ValidationError {
                    message: format!("Target '{}' is declared more than once", target.name),
                });
            }
            if let Some(flag) = &target.mode_flag {
                if flag.name.trim().is_empty() {
                    return Err(ConfigError::ValidationError {
                        message: format!("Target '{}' has an empty mode flag name", target.name),
                    });
                }
                if !flags.insert(flag.name.as_str()) {
                    return Err(ConfigError::ValidationError {
                        message: format!("Mode flag '{}' is declared more than once", flag.name),
                    });
                }
            }
        }

        Ok(())
    }

    /// Looks up a target by name.
    pub fn target(&self, name: &str) -> Result<&TargetDef, ConfigError> {
        self.targets
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| ConfigError::UnknownTarget {
                name: name.to_string(),
            })
    }

    /// Default staging directory: `copywire-out` next to the target file.
    pub fn default_out_dir(&self) -> PathBuf {
        self.base_dir.join("copywire-out")
    }
}

fn is_valid_target_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
