//! Build-time mode selection.
//!
//! A switchable target declares a [`ModeFlag`]. During evaluation the flag
//! is looked up in [`BuildSettings`] exactly once and the [`ModeRegistry`]
//! picks the matching precomputed argument list. Values outside the domain
//! fail closed.

mod flag;
mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use flag::{BuildSettings, ModeFlag};
pub use registry::{ModeRegistry, ModeVariantMap, ResolvedPreset};

/// Closed domain of a mode flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Apply changes to the destination.
    #[default]
    Migrate,
    /// Report intended changes without mutating anything.
    DryRun,
}

impl Mode {
    /// Stable value used in `--define` and the target file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Migrate => "migrate",
            Self::DryRun => "dry-run",
        }
    }

    /// All variants for iteration.
    pub fn all() -> &'static [Mode] {
        &[Self::Migrate, Self::DryRun]
    }

    /// Parse a raw flag value. Anything outside the domain returns `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "migrate" => Some(Self::Migrate),
            "dry-run" => Some(Self::DryRun),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
