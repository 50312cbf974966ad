use std::process::{Command, ExitStatus};

use crate::launcher::error::LaunchError;
use crate::launcher::signals::SignalForwarder;

/// A fully merged engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

/// How the engine process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineExit {
    Code(i32),
    /// Killed by this signal number.
    Signal(i32),
}

impl EngineExit {
    pub fn success(&self) -> bool {
        matches!(self, EngineExit::Code(0))
    }

    /// Exit code to propagate: the engine's own code, or `128 + signal`.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineExit::Code(code) => *code,
            EngineExit::Signal(signal) => 128 + signal,
        }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return EngineExit::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return EngineExit::Signal(signal);
            }
        }
        EngineExit::Code(1)
    }
}

/// Dispatches an invocation to the engine.
pub trait EngineRunner {
    /// Run once and block until the engine exits. No retries.
    fn run(&self, invocation: &Invocation) -> Result<EngineExit, LaunchError>;
}

/// Runs the engine as a child process sharing this process's stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl EngineRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<EngineExit, LaunchError> {
        tracing::debug!(
            program = %invocation.program,
            args = ?invocation.args,
            "dispatching to engine"
        );

        let forwarder = match SignalForwarder::register() {
            Ok(forwarder) => Some(forwarder),
            Err(e) => {
                tracing::warn!("Signal forwarding unavailable: {}", e);
                None
            }
        };

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .spawn()
            .map_err(|e| LaunchError::from_spawn(&invocation.program, e))?;

        let forwarding = forwarder.map(|forwarder| forwarder.forward_to(child.id()));

        let status = child.wait().map_err(|source| LaunchError::Wait { source });

        if let Some(forwarding) = forwarding {
            forwarding.stop();
        }

        let exit = EngineExit::from_status(status?);
        tracing::debug!(?exit, "engine finished");
        Ok(exit)
    }
}
