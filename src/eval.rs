//! Evaluation — ties target declarations, mode resolution and staging
//! together.
//!
//! Runs before any engine process. Each target is evaluated independently:
//! a configuration error fails that target and leaves its siblings alone.

use std::collections::HashSet;

use crate::args::{fixed_preset, ArgumentList};
use crate::config::{ConfigError, TargetDef, TargetFile, TargetKind};
use crate::mode::{BuildSettings, Mode, ModeRegistry, ModeVariantMap};
use crate::stage;
use crate::workflow::{ConfigHandle, WorkflowSpec};

/// A target's preset, ready to stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakedTarget {
    pub name: String,
    pub kind: TargetKind,
    pub mode: Mode,
    pub args: ArgumentList,
    /// Preset in stage format.
    pub rendered: String,
}

/// Outcome of evaluating one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetPlan {
    Baked(BakedTarget),
    /// Validate-only target; nothing to bake.
    ValidateOnly,
}

#[derive(Debug)]
pub struct TargetFailure {
    pub target: String,
    pub error: ConfigError,
}

/// Everything one evaluation produced, in declaration order.
#[derive(Debug, Default)]
pub struct EvaluationReport {
    pub baked: Vec<BakedTarget>,
    pub skipped: Vec<String>,
    pub failures: Vec<TargetFailure>,
}

impl EvaluationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Evaluate a single target.
pub fn evaluate_target(
    file: &TargetFile,
    target: &TargetDef,
    settings: &BuildSettings,
) -> Result<TargetPlan, ConfigError> {
    match (target.kind, &target.mode_flag) {
        (TargetKind::Switchable, None) => {
            return Err(ConfigError::MissingModeFlag {
                target: target.name.clone(),
            })
        }
        (TargetKind::Migrate | TargetKind::Validate, Some(_)) => {
            return Err(ConfigError::MisplacedModeFlag {
                target: target.name.clone(),
            })
        }
        _ => {}
    }

    let config = ConfigHandle::resolve(file.base_dir(), &target.config)?;
    if target.kind == TargetKind::Validate {
        tracing::debug!(target_name = %target.name, "validate-only target, nothing to bake");
        return Ok(TargetPlan::ValidateOnly);
    }

    let spec = workflow_spec(target, config)?;
    let (mode, args) = match &target.mode_flag {
        Some(flag) => {
            if target.dry_run {
                tracing::warn!(
                    target_name = %target.name,
                    "dry_run is ignored on switchable targets; mode flag '{}' decides",
                    flag.name
                );
            }
            let registry = ModeRegistry::new(flag.clone(), ModeVariantMap::for_spec(&spec));
            let resolved = registry.resolve(settings)?;
            (resolved.mode, resolved.args)
        }
        None => (spec.fixed_mode(), fixed_preset(&spec)),
    };

    if spec.force_ignored(mode) {
        tracing::warn!(target_name = %target.name, "force has no effect in dry-run mode and was dropped");
    }

    let rendered = stage::render(&args)?;
    Ok(TargetPlan::Baked(BakedTarget {
        name: target.name.clone(),
        kind: target.kind,
        mode,
        args,
        rendered,
    }))
}

/// Evaluate every declared target against one set of build settings.
pub fn evaluate(file: &TargetFile, settings: &BuildSettings) -> EvaluationReport {
    warn_unknown_defines(file, settings);
    evaluate_targets(file, &file.targets, settings)
}

/// Evaluate only the named targets, in the order given.
///
/// An undeclared name fails the whole selection before anything is evaluated.
pub fn evaluate_selected(
    file: &TargetFile,
    names: &[String],
    settings: &BuildSettings,
) -> Result<EvaluationReport, ConfigError> {
    let selected = names
        .iter()
        .map(|name| file.target(name))
        .collect::<Result<Vec<_>, _>>()?;
    warn_unknown_defines(file, settings);
    Ok(evaluate_targets(file, selected, settings))
}

fn evaluate_targets<'a, I>(file: &TargetFile, targets: I, settings: &BuildSettings) -> EvaluationReport
where
    I: IntoIterator<Item = &'a TargetDef>,
{
    let mut report = EvaluationReport::default();
    for target in targets {
        match evaluate_target(file, target, settings) {
            Ok(TargetPlan::Baked(baked)) => report.baked.push(baked),
            Ok(TargetPlan::ValidateOnly) => report.skipped.push(target.name.clone()),
            Err(error) => {
                tracing::debug!(target_name = %target.name, "evaluation failed: {}", error);
                report.failures.push(TargetFailure {
                    target: target.name.clone(),
                    error,
                });
            }
        }
    }
    report
}

fn workflow_spec(target: &TargetDef, config: ConfigHandle) -> Result<WorkflowSpec, ConfigError> {
    let workflow = target
        .workflow
        .as_deref()
        .filter(|w| !w.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingWorkflow {
            target: target.name.clone(),
        })?;

    WorkflowSpec::builder(config, workflow)
        .force(target.force)
        .ignore_noop(target.ignore_noop)
        .dry_run(target.dry_run)
        .build()
}

/// Defines that no target reads are not ambiguous, just unused.
pub fn warn_unknown_defines(file: &TargetFile, settings: &BuildSettings) {
    let declared: HashSet<&str> = file
        .targets
        .iter()
        .filter_map(|t| t.mode_flag.as_ref())
        .map(|f| f.name.as_str())
        .collect();
    for name in settings.names() {
        if !declared.contains(name) {
            tracing::warn!(flag = name, "define does not match any declared mode flag");
        }
    }
}
