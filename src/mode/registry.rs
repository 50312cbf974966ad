use crate::args::{dry_run_probe, migrate_preset, ArgumentList};
use crate::config::ConfigError;
use crate::mode::{BuildSettings, Mode, ModeFlag};
use crate::workflow::WorkflowSpec;

/// One precomputed argument list per [`Mode`].
///
/// A struct rather than a map: every domain value has a field, so lookup is
/// an exhaustive match and no value can be left unmapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeVariantMap {
    migrate: ArgumentList,
    dry_run: ArgumentList,
}

impl ModeVariantMap {
    pub fn new(migrate: ArgumentList, dry_run: ArgumentList) -> Self {
        Self { migrate, dry_run }
    }

    /// Standard variants for a workflow: the migrate preset and the dry-run probe.
    pub fn for_spec(spec: &WorkflowSpec) -> Self {
        Self::new(migrate_preset(spec, Mode::Migrate), dry_run_probe(spec))
    }

    pub fn get(&self, mode: Mode) -> &ArgumentList {
        match mode {
            Mode::Migrate => &self.migrate,
            Mode::DryRun => &self.dry_run,
        }
    }
}

/// The list chosen for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPreset {
    pub mode: Mode,
    pub args: ArgumentList,
}

/// Selects one of the precomputed variants from a build-time flag.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    flag: ModeFlag,
    variants: ModeVariantMap,
}

impl ModeRegistry {
    pub fn new(flag: ModeFlag, variants: ModeVariantMap) -> Self {
        Self { flag, variants }
    }

    /// Reads the flag once: the define if present, otherwise the declared default.
    pub fn resolve_mode(&self, settings: &BuildSettings) -> Result<Mode, ConfigError> {
        match settings.get(&self.flag.name) {
            None => Ok(self.flag.default),
            Some(raw) => Mode::parse(raw).ok_or_else(|| ConfigError::ModeOutOfDomain {
                flag: self.flag.name.clone(),
                value: raw.to_string(),
            }),
        }
    }

    /// Resolves the flag and returns the matching list. Never falls back to
    /// the default on a bad value.
    pub fn resolve(&self, settings: &BuildSettings) -> Result<ResolvedPreset, ConfigError> {
        let mode = self.resolve_mode(settings)?;
        tracing::debug!(flag = %self.flag.name, %mode, "mode flag resolved");
        Ok(ResolvedPreset {
            mode,
            args: self.variants.get(mode).clone(),
        })
    }
}
