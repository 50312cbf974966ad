//! Argument composition for engine invocations.
//!
//! ```text
//! WorkflowSpec + Mode → ArgAssembler (verb, positionals, registry flags) → ArgumentList
//! ```
//!
//! Every stage is a pure function; the same spec always yields the same list.

mod assembler;
mod preset;
mod registry;

use serde::Serialize;

pub use assembler::ArgAssembler;
pub use preset::{dry_run_probe, fixed_preset, migrate_preset, validate_preset};
pub use registry::{flag_registry, FlagCondition, FlagDef};

/// Engine sub-command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Validate,
    Migrate,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Migrate => "migrate",
        }
    }
}

/// Ordered engine arguments. Order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ArgumentList(Vec<String>);

impl ArgumentList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Arguments that are not `--` flags, in order.
    pub fn positionals(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|a| !a.starts_with("--"))
            .map(String::as_str)
            .collect()
    }

    /// `--` flags, in order.
    pub fn flags(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|a| a.starts_with("--"))
            .map(String::as_str)
            .collect()
    }
}

impl From<Vec<String>> for ArgumentList {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
