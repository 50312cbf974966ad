//! Tests for preset composition.

mod common;

use common::{spec, Workspace};
use copywire::args::{
    dry_run_probe, fixed_preset, flag_registry, migrate_preset, validate_preset, ArgAssembler,
    Verb,
};
use copywire::mode::Mode;
use copywire::workflow::WorkflowSpec;

#[test]
fn ignore_noop_only() {
    let ws = Workspace::new();
    let args = fixed_preset(&spec(&ws, false, true, false));
    assert_eq!(
        args.as_slice(),
        ["migrate", "copy.bara.sky", "sync-docs", "--ignore-noop"]
    );
}

#[test]
fn force_precedes_ignore_noop() {
    let ws = Workspace::new();
    let args = fixed_preset(&spec(&ws, true, true, false));
    assert_eq!(
        args.as_slice(),
        ["migrate", "copy.bara.sky", "sync-docs", "--force", "--ignore-noop"]
    );
}

#[test]
fn no_flags_is_positionals_only() {
    let ws = Workspace::new();
    let args = fixed_preset(&spec(&ws, false, false, false));
    assert_eq!(args.as_slice(), ["migrate", "copy.bara.sky", "sync-docs"]);
}

#[test]
fn builder_call_order_does_not_change_output() {
    let ws = Workspace::new();
    let a = WorkflowSpec::builder(ws.config(), "sync-docs")
        .force(true)
        .ignore_noop(true)
        .build()
        .unwrap();
    let b = WorkflowSpec::builder(ws.config(), "sync-docs")
        .ignore_noop(true)
        .force(true)
        .build()
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(fixed_preset(&a), fixed_preset(&b));
    assert_eq!(fixed_preset(&a), fixed_preset(&a));
}

#[test]
fn dry_run_mode_appends_dry_run_last_and_drops_force() {
    let ws = Workspace::new();
    let args = fixed_preset(&spec(&ws, true, true, true));
    assert_eq!(
        args.as_slice(),
        ["migrate", "copy.bara.sky", "sync-docs", "--ignore-noop", "--dry-run"]
    );
}

#[test]
fn explicit_mode_overrides_spec_dry_run() {
    let ws = Workspace::new();
    let s = spec(&ws, true, false, true);
    assert_eq!(
        migrate_preset(&s, Mode::Migrate).as_slice(),
        ["migrate", "copy.bara.sky", "sync-docs", "--force"]
    );
}

#[test]
fn dry_run_probe_puts_flag_after_verb() {
    let ws = Workspace::new();
    let args = dry_run_probe(&spec(&ws, true, true, false));
    assert_eq!(
        args.as_slice(),
        ["migrate", "--dry-run", "copy.bara.sky", "sync-docs"]
    );
}

#[test]
fn validate_preset_has_no_workflow() {
    let ws = Workspace::new();
    assert_eq!(
        validate_preset(&ws.config()).as_slice(),
        ["validate", "copy.bara.sky"]
    );
}

#[test]
fn registry_order_is_declared_order() {
    let order: Vec<&str> = flag_registry().iter().map(|d| d.long).collect();
    assert_eq!(order, ["--force", "--ignore-noop", "--dry-run"]);
}

#[test]
fn positionals_precede_flags() {
    let ws = Workspace::new();
    let args = fixed_preset(&spec(&ws, true, true, false));
    let first_flag = args.iter().position(|a| a.starts_with("--")).unwrap();
    assert_eq!(first_flag, 3);
    assert!(args.iter().skip(first_flag).all(|a| a.starts_with("--")));
}

#[test]
fn assembler_with_flag_appends_verbatim() {
    let ws = Workspace::new();
    let args = ArgAssembler::new(Verb::Migrate)
        .with_config(&ws.config())
        .with_workflow("wf")
        .with_flag("--init-history")
        .build();
    assert_eq!(
        args.as_slice(),
        ["migrate", "copy.bara.sky", "wf", "--init-history"]
    );
}

#[test]
fn every_registry_flag_is_described() {
    for def in flag_registry() {
        assert!(def.long.starts_with("--"));
        assert!(!def.description.trim().is_empty(), "{} has no description", def.long);
    }
}
