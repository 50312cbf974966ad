use std::path::PathBuf;

use thiserror::Error;

/// Exit code for preset problems and other launch failures.
pub const EXIT_LAUNCH_FAILURE: i32 = 125;
/// Exit code when the engine exists but cannot be executed.
pub const EXIT_ENGINE_NOT_EXECUTABLE: i32 = 126;
/// Exit code when the engine program cannot be found.
pub const EXIT_ENGINE_NOT_FOUND: i32 = 127;

/// Failures that stop a launch before the engine produces any output.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("No preset given: pass --preset or set {env}")]
    PresetNotConfigured { env: &'static str },

    #[error("Preset file '{path}' does not exist")]
    PresetMissing { path: PathBuf },

    #[error("Failed to read preset file '{path}': {source}")]
    PresetUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preset file '{path}' holds no arguments")]
    EmptyPreset { path: PathBuf },

    #[error("Engine '{program}' not found")]
    EngineNotFound { program: String },

    #[error("Engine '{program}' is not executable")]
    EngineNotExecutable { program: String },

    #[error("Failed to start engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for engine: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    /// Classify a spawn failure.
    pub fn from_spawn(program: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => LaunchError::EngineNotFound {
                program: program.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => LaunchError::EngineNotExecutable {
                program: program.to_string(),
            },
            _ => LaunchError::Spawn {
                program: program.to_string(),
                source,
            },
        }
    }

    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::EngineNotFound { .. } => EXIT_ENGINE_NOT_FOUND,
            LaunchError::EngineNotExecutable { .. } => EXIT_ENGINE_NOT_EXECUTABLE,
            LaunchError::PresetNotConfigured { .. }
            | LaunchError::PresetMissing { .. }
            | LaunchError::PresetUnreadable { .. }
            | LaunchError::EmptyPreset { .. }
            | LaunchError::Spawn { .. }
            | LaunchError::Wait { .. } => EXIT_LAUNCH_FAILURE,
        }
    }
}
