//! Tests for build-time mode resolution.

mod common;

use common::{spec, Workspace};
use copywire::config::ConfigError;
use copywire::mode::{BuildSettings, Mode, ModeFlag, ModeRegistry, ModeVariantMap};

fn registry(ws: &Workspace, default: Mode) -> ModeRegistry {
    let spec = spec(ws, false, true, false);
    ModeRegistry::new(
        ModeFlag::new("sync_docs_mode", default),
        ModeVariantMap::for_spec(&spec),
    )
}

#[test]
fn dry_run_value_selects_probe() {
    let ws = Workspace::new();
    let settings = BuildSettings::new().with("sync_docs_mode", "dry-run");
    let resolved = registry(&ws, Mode::Migrate).resolve(&settings).unwrap();

    assert_eq!(resolved.mode, Mode::DryRun);
    assert_eq!(
        resolved.args.as_slice(),
        ["migrate", "--dry-run", "copy.bara.sky", "sync-docs"]
    );
}

#[test]
fn migrate_value_selects_migrate_preset() {
    let ws = Workspace::new();
    let settings = BuildSettings::new().with("sync_docs_mode", "migrate");
    let resolved = registry(&ws, Mode::DryRun).resolve(&settings).unwrap();

    assert_eq!(resolved.mode, Mode::Migrate);
    assert_eq!(
        resolved.args.as_slice(),
        ["migrate", "copy.bara.sky", "sync-docs", "--ignore-noop"]
    );
}

#[test]
fn out_of_domain_value_fails_closed() {
    let ws = Workspace::new();
    let settings = BuildSettings::new().with("sync_docs_mode", "bogus");
    let err = registry(&ws, Mode::Migrate).resolve(&settings).unwrap_err();

    match err {
        ConfigError::ModeOutOfDomain { flag, value } => {
            assert_eq!(flag, "sync_docs_mode");
            assert_eq!(value, "bogus");
        }
        other => panic!("Expected ModeOutOfDomain, got {other:?}"),
    }
}

#[test]
fn empty_value_is_out_of_domain_not_default() {
    let ws = Workspace::new();
    let settings = BuildSettings::new().with("sync_docs_mode", "");
    assert!(matches!(
        registry(&ws, Mode::Migrate).resolve_mode(&settings),
        Err(ConfigError::ModeOutOfDomain { .. })
    ));
}

#[test]
fn missing_define_uses_declared_default() {
    let ws = Workspace::new();
    let settings = BuildSettings::new().with("other_flag", "dry-run");
    assert_eq!(
        registry(&ws, Mode::DryRun).resolve_mode(&settings).unwrap(),
        Mode::DryRun
    );
    assert_eq!(
        registry(&ws, Mode::Migrate).resolve_mode(&settings).unwrap(),
        Mode::Migrate
    );
}

#[test]
fn every_domain_value_resolves_to_exactly_one_list() {
    let ws = Workspace::new();
    let reg = registry(&ws, Mode::Migrate);
    for mode in Mode::all() {
        let settings = BuildSettings::new().with("sync_docs_mode", mode.as_str());
        let resolved = reg.resolve(&settings).unwrap();
        assert_eq!(resolved.mode, *mode);
        assert!(!resolved.args.is_empty());
    }
}

#[test]
fn variants_share_positionals() {
    let ws = Workspace::new();
    let variants = ModeVariantMap::for_spec(&spec(&ws, true, true, false));

    let migrate = variants.get(Mode::Migrate);
    let dry_run = variants.get(Mode::DryRun);

    assert_eq!(migrate.positionals(), dry_run.positionals());
    assert_eq!(migrate.flags(), ["--force", "--ignore-noop"]);
    assert_eq!(dry_run.flags(), ["--dry-run"]);
}

#[test]
fn parse_defines_last_wins() {
    let settings =
        BuildSettings::parse_defines(["a=migrate", "b=dry-run", "a=dry-run"]).unwrap();
    assert_eq!(settings.get("a"), Some("dry-run"));
    assert_eq!(settings.get("b"), Some("dry-run"));
    assert_eq!(settings.names().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn parse_defines_keeps_equals_in_value() {
    let settings = BuildSettings::parse_defines(["a=x=y"]).unwrap();
    assert_eq!(settings.get("a"), Some("x=y"));
}

#[test]
fn parse_defines_rejects_malformed() {
    assert!(matches!(
        BuildSettings::parse_defines(["no-equals"]),
        Err(ConfigError::MalformedDefine { .. })
    ));
    assert!(matches!(
        BuildSettings::parse_defines(["=dry-run"]),
        Err(ConfigError::MalformedDefine { .. })
    ));
}
