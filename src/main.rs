use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use copywire::config::{ConfigError, TargetFile};
use copywire::eval::{evaluate, evaluate_selected, evaluate_target, EvaluationReport, TargetPlan};
use copywire::launcher::{
    resolve_engine, resolve_preset_path, LaunchError, Launcher, ProcessRunner,
};
use copywire::logging::init_tracing;
use copywire::mode::BuildSettings;
use copywire::stage::{self, WriteOutcome};
use copywire::validate::{record_outcome, remove_info, GateOutcome, ValidationGate};
use copywire::workflow::ConfigHandle;

/// Exit code for configuration errors found during evaluation.
const EXIT_CONFIG_ERROR: i32 = 2;

/// Bake migration-engine invocations and launch them.
#[derive(Parser)]
#[command(name = "copywire")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the target file (default: ./copywire.toml)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EvalArgs {
    /// Set a mode flag for this evaluation (repeatable)
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE")]
    defines: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate targets and stage their presets
    Bake {
        #[command(flatten)]
        eval: EvalArgs,

        /// Staging directory (default: copywire-out next to the target file)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Targets to bake (default: every target)
        targets: Vec<String>,
    },

    /// Print the preset a target would bake
    Show {
        #[command(flatten)]
        eval: EvalArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        target: String,
    },

    /// Bake one target and launch it
    Run {
        #[command(flatten)]
        eval: EvalArgs,

        /// Staging directory (default: copywire-out next to the target file)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Engine program (default: engine.program from the target file)
        #[arg(long)]
        engine: Option<String>,

        target: String,

        /// Arguments appended after the preset
        #[arg(last = true)]
        trailing: Vec<String>,
    },

    /// Launch a staged preset
    Launch {
        /// Preset file (default: $COPYWIRE_PRESET)
        #[arg(long)]
        preset: Option<PathBuf>,

        /// Engine program (default: $COPYWIRE_ENGINE, then "copybara")
        #[arg(long)]
        engine: Option<String>,

        /// Arguments appended after the preset
        #[arg(last = true)]
        trailing: Vec<String>,
    },

    /// Run the engine's validate action
    Validate {
        /// Staging directory for info records
        #[arg(long)]
        out: Option<PathBuf>,

        /// Engine program (default: engine.program from the target file)
        #[arg(long)]
        engine: Option<String>,

        /// Validate every declared target
        #[arg(long)]
        all: bool,

        targets: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match execute(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    };
    process::exit(code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(launch) = err.downcast_ref::<LaunchError>() {
        return launch.exit_code();
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return EXIT_CONFIG_ERROR;
    }
    1
}

fn execute(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Bake { eval, out, targets } => bake(cli.file, &eval, out, &targets),
        Commands::Show { eval, json, target } => show(cli.file, &eval, json, &target),
        Commands::Run {
            eval,
            out,
            engine,
            target,
            trailing,
        } => run(cli.file, &eval, out, engine, &target, trailing),
        Commands::Launch {
            preset,
            engine,
            trailing,
        } => launch(preset, engine, trailing),
        Commands::Validate {
            out,
            engine,
            all,
            targets,
        } => validate(cli.file, out, engine, all, &targets),
    }
}

fn load_targets(path: Option<PathBuf>) -> Result<TargetFile, ConfigError> {
    let path = path.unwrap_or_else(|| PathBuf::from(TargetFile::DEFAULT_FILE_NAME));
    TargetFile::load_from(&path)
}

fn stage_preset(out_dir: &Path, name: &str, rendered: &str) -> Result<PathBuf> {
    let path = stage::preset_path(out_dir, name);
    let outcome = stage::write_preset(&path, rendered)
        .with_context(|| format!("failed to stage preset for '{}' at {}", name, path.display()))?;
    match outcome {
        WriteOutcome::Written => tracing::info!("staged {}", path.display()),
        WriteOutcome::Unchanged => tracing::debug!("{} unchanged", path.display()),
    }
    Ok(path)
}

fn bake(
    file_path: Option<PathBuf>,
    eval: &EvalArgs,
    out: Option<PathBuf>,
    targets: &[String],
) -> Result<i32> {
    let file = load_targets(file_path)?;
    let settings = BuildSettings::parse_defines(&eval.defines)?;
    let out_dir = out.unwrap_or_else(|| file.default_out_dir());

    let report: EvaluationReport = if targets.is_empty() {
        evaluate(&file, &settings)
    } else {
        evaluate_selected(&file, targets, &settings)?
    };

    for baked in &report.baked {
        let path = stage_preset(&out_dir, &baked.name, &baked.rendered)?;
        println!("{} ({}): {}", baked.name, baked.mode, path.display());
    }
    for name in &report.skipped {
        tracing::info!("{}: validate-only, not baked", name);
    }
    for failure in &report.failures {
        eprintln!("Error: target '{}': {}", failure.target, failure.error);
        let stale = stage::preset_path(&out_dir, &failure.target);
        if stage::remove_preset(&stale)
            .with_context(|| format!("failed to remove stale preset {}", stale.display()))?
        {
            tracing::warn!("removed stale preset {}", stale.display());
        }
    }

    Ok(if report.is_success() { 0 } else { EXIT_CONFIG_ERROR })
}

fn show(file_path: Option<PathBuf>, eval: &EvalArgs, json: bool, name: &str) -> Result<i32> {
    let file = load_targets(file_path)?;
    let settings = BuildSettings::parse_defines(&eval.defines)?;
    let target = file.target(name)?;

    let (mode, args) = match evaluate_target(&file, target, &settings)? {
        TargetPlan::Baked(baked) => (Some(baked.mode), baked.args),
        TargetPlan::ValidateOnly => {
            let config = ConfigHandle::resolve(file.base_dir(), &target.config)?;
            (None, ValidationGate::new(config).args())
        }
    };

    if json {
        let value = serde_json::json!({
            "target": target.name,
            "kind": target.kind.as_str(),
            "mode": mode.map(|m| m.as_str()),
            "args": args,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for arg in &args {
            println!("{}", arg);
        }
    }
    Ok(0)
}

fn run(
    file_path: Option<PathBuf>,
    eval: &EvalArgs,
    out: Option<PathBuf>,
    engine: Option<String>,
    name: &str,
    trailing: Vec<String>,
) -> Result<i32> {
    let file = load_targets(file_path)?;
    let settings = BuildSettings::parse_defines(&eval.defines)?;
    let target = file.target(name)?;

    let baked = match evaluate_target(&file, target, &settings)? {
        TargetPlan::Baked(baked) => baked,
        TargetPlan::ValidateOnly => {
            bail!("target '{}' is validate-only; use `copywire validate {}`", name, name)
        }
    };

    let out_dir = out.unwrap_or_else(|| file.default_out_dir());
    let preset = stage_preset(&out_dir, &baked.name, &baked.rendered)?;

    let engine = engine.unwrap_or_else(|| file.engine.program.clone());
    let exit = Launcher::new(engine, ProcessRunner).launch(&preset, trailing)?;
    Ok(exit.exit_code())
}

fn launch(preset: Option<PathBuf>, engine: Option<String>, trailing: Vec<String>) -> Result<i32> {
    let preset = resolve_preset_path(preset)?;
    let launcher = Launcher::new(resolve_engine(engine), ProcessRunner);
    let exit = launcher.launch(&preset, trailing)?;
    Ok(exit.exit_code())
}

fn validate(
    file_path: Option<PathBuf>,
    out: Option<PathBuf>,
    engine: Option<String>,
    all: bool,
    names: &[String],
) -> Result<i32> {
    let file = load_targets(file_path)?;
    if names.is_empty() && !all {
        bail!("name at least one target to validate, or pass --all");
    }

    let selected = if all {
        file.targets.iter().collect::<Vec<_>>()
    } else {
        names
            .iter()
            .map(|name| file.target(name))
            .collect::<Result<Vec<_>, _>>()?
    };

    let out_dir = out.unwrap_or_else(|| file.default_out_dir());
    let engine = engine.unwrap_or_else(|| file.engine.program.clone());

    let mut engine_failure: Option<i32> = None;
    let mut launch_failure: Option<i32> = None;
    let mut config_failure = false;
    for target in selected {
        let config = match ConfigHandle::resolve(file.base_dir(), &target.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: target '{}': {}", target.name, e);
                drop_stale_info(&out_dir, &target.name)?;
                config_failure = true;
                continue;
            }
        };

        let gate = ValidationGate::new(config).with_tags(target.tags.clone());
        let outcome = match gate.run(&engine, &ProcessRunner) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("Error: target '{}': {}", target.name, e);
                drop_stale_info(&out_dir, &target.name)?;
                if launch_failure.is_none() {
                    launch_failure = Some(e.exit_code());
                }
                continue;
            }
        };
        record_outcome(&out_dir, &target.name, &outcome)
            .with_context(|| format!("failed to record validation for '{}'", target.name))?;

        match outcome {
            GateOutcome::Validated(_) => println!("{}: validated", target.name),
            GateOutcome::Rejected(exit) => {
                eprintln!("{}: validation failed (exit {})", target.name, exit.exit_code());
                if engine_failure.is_none() {
                    engine_failure = Some(exit.exit_code());
                }
            }
        }
    }

    Ok(match (engine_failure.or(launch_failure), config_failure) {
        (Some(code), _) => code,
        (None, true) => EXIT_CONFIG_ERROR,
        (None, false) => 0,
    })
}

/// A target that could not be validated this run has no valid record.
fn drop_stale_info(out_dir: &Path, name: &str) -> Result<()> {
    if remove_info(out_dir, name)
        .with_context(|| format!("failed to remove stale validation record for '{}'", name))?
    {
        tracing::warn!("removed stale validation record for {}", name);
    }
    Ok(())
}
