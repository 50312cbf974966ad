//! Runtime side: read a staged preset, append trailing arguments, run the
//! engine once and report its exit code.
//!
//! The launcher never recomputes or interprets arguments. What was baked is
//! what runs.

mod error;
mod runner;
mod signals;

use std::path::{Path, PathBuf};

pub use error::{
    LaunchError, EXIT_ENGINE_NOT_EXECUTABLE, EXIT_ENGINE_NOT_FOUND, EXIT_LAUNCH_FAILURE,
};
pub use runner::{EngineExit, EngineRunner, Invocation, ProcessRunner};

use crate::args::ArgumentList;
use crate::stage::{read_preset, PRESET_ENV};

/// Environment variable naming the engine program for `launch`.
pub const ENGINE_ENV: &str = "COPYWIRE_ENGINE";
/// Engine used when neither `--engine` nor [`ENGINE_ENV`] is given.
pub const DEFAULT_ENGINE: &str = "copybara";

/// `presets ++ trailing`. Presets always come first; nothing is dropped,
/// deduplicated or reordered.
pub fn merge<I>(presets: ArgumentList, trailing: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = presets.into_vec();
    args.extend(trailing);
    args
}

/// Picks the preset file: the explicit path, else [`PRESET_ENV`].
pub fn resolve_preset_path(explicit: Option<PathBuf>) -> Result<PathBuf, LaunchError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    match std::env::var_os(PRESET_ENV) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => Err(LaunchError::PresetNotConfigured { env: PRESET_ENV }),
    }
}

/// Picks the engine program: the explicit value, else [`ENGINE_ENV`], else
/// [`DEFAULT_ENGINE`].
pub fn resolve_engine(explicit: Option<String>) -> String {
    explicit
        .or_else(|| std::env::var(ENGINE_ENV).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_ENGINE.to_string())
}

/// Merges presets with trailing arguments and dispatches to the engine.
pub struct Launcher<R> {
    engine: String,
    runner: R,
}

impl<R: EngineRunner> Launcher<R> {
    pub fn new(engine: impl Into<String>, runner: R) -> Self {
        Self {
            engine: engine.into(),
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Reads the preset at `preset` and launches. A missing or unreadable
    /// preset fails before the engine is touched.
    pub fn launch(&self, preset: &Path, trailing: Vec<String>) -> Result<EngineExit, LaunchError> {
        let presets = read_preset(preset)?;
        tracing::debug!(preset = %preset.display(), count = presets.len(), "preset loaded");
        self.launch_preset(presets, trailing)
    }

    /// Launches with an already loaded preset.
    pub fn launch_preset(
        &self,
        presets: ArgumentList,
        trailing: Vec<String>,
    ) -> Result<EngineExit, LaunchError> {
        let invocation = Invocation {
            program: self.engine.clone(),
            args: merge(presets, trailing),
        };
        self.runner.run(&invocation)
    }
}
