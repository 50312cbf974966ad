//! Preset builders: one pure function per invocation shape.

use crate::args::assembler::ArgAssembler;
use crate::args::{ArgumentList, Verb};
use crate::mode::Mode;
use crate::workflow::{ConfigHandle, WorkflowSpec};

/// `migrate <config> <workflow> [--force] [--ignore-noop] [--dry-run]`.
///
/// `--force` is dropped in dry-run mode since nothing is written.
pub fn migrate_preset(spec: &WorkflowSpec, mode: Mode) -> ArgumentList {
    ArgAssembler::new(Verb::Migrate)
        .with_config(spec.config())
        .with_workflow(spec.workflow())
        .with_registry_flags(spec, mode)
        .build()
}

/// Preset for a fixed-mode target, mode taken from the spec's `dry_run`.
pub fn fixed_preset(spec: &WorkflowSpec) -> ArgumentList {
    migrate_preset(spec, spec.fixed_mode())
}

/// Dry-run variant of a switchable target:
/// `migrate --dry-run <config> <workflow>`.
///
/// Carries no behavior flags, so it is safe whatever the spec asks for.
pub fn dry_run_probe(spec: &WorkflowSpec) -> ArgumentList {
    ArgAssembler::new(Verb::Migrate)
        .with_flag("--dry-run")
        .with_config(spec.config())
        .with_workflow(spec.workflow())
        .build()
}

/// `validate <config>`.
pub fn validate_preset(config: &ConfigHandle) -> ArgumentList {
    ArgAssembler::new(Verb::Validate).with_config(config).build()
}
