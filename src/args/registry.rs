//! Flag registry — single source of truth for optional engine flags.
//!
//! Registry order is emission order. It is never sorted and never follows
//! the order in which a caller happened to set options.

use crate::mode::Mode;
use crate::workflow::WorkflowSpec;

/// When a registry flag is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagCondition {
    /// `force` is set and the mode mutates. Dry-run drops it.
    ForceInMigrate,
    /// `ignore_noop` is set.
    IgnoreNoop,
    /// The mode is dry-run.
    DryRunMode,
}

/// A single flag definition.
#[derive(Debug, Clone)]
pub struct FlagDef {
    /// Long form passed to the engine (e.g., "--force").
    pub long: &'static str,
    pub condition: FlagCondition,
    /// Human-readable description, logged when the flag is emitted.
    pub description: &'static str,
}

static FLAG_REGISTRY: [FlagDef; 3] = [
    FlagDef {
        long: "--force",
        condition: FlagCondition::ForceInMigrate,
        description: "Overwrite destination state the engine would otherwise refuse to touch",
    },
    FlagDef {
        long: "--ignore-noop",
        condition: FlagCondition::IgnoreNoop,
        description: "Succeed when the migration produces no changes",
    },
    FlagDef {
        long: "--dry-run",
        condition: FlagCondition::DryRunMode,
        description: "Report intended changes without writing them",
    },
];

/// The complete registry, in emission order.
pub fn flag_registry() -> &'static [FlagDef] {
    &FLAG_REGISTRY
}

impl FlagDef {
    /// Whether this flag is emitted for `spec` in `mode`.
    pub fn applies(&self, spec: &WorkflowSpec, mode: Mode) -> bool {
        match self.condition {
            FlagCondition::ForceInMigrate => spec.force() && mode == Mode::Migrate,
            FlagCondition::IgnoreNoop => spec.ignore_noop(),
            FlagCondition::DryRunMode => mode == Mode::DryRun,
        }
    }
}
