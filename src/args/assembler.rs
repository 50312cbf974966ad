//! Argument assembler — all engine args in one place.

use crate::args::registry::flag_registry;
use crate::args::{ArgumentList, Verb};
use crate::mode::Mode;
use crate::workflow::{ConfigHandle, WorkflowSpec};

/// Builder for the argument list handed to the engine.
#[derive(Debug, Clone)]
pub struct ArgAssembler {
    args: Vec<String>,
}

impl ArgAssembler {
    /// Start with the engine verb.
    pub fn new(verb: Verb) -> Self {
        Self {
            args: vec![verb.as_str().to_string()],
        }
    }

    /// Config path as declared.
    pub fn with_config(mut self, config: &ConfigHandle) -> Self {
        self.args.push(config.as_arg().to_string());
        self
    }

    pub fn with_workflow(mut self, workflow: &str) -> Self {
        self.args.push(workflow.to_string());
        self
    }

    /// Add a single flag verbatim.
    pub fn with_flag(mut self, long: &str) -> Self {
        self.args.push(long.to_string());
        self
    }

    /// Registry flags that apply to `spec` in `mode`, in registry order.
    pub fn with_registry_flags(mut self, spec: &WorkflowSpec, mode: Mode) -> Self {
        self.args.extend(
            flag_registry()
                .iter()
                .filter(|def| def.applies(spec, mode))
                .map(|def| {
                    tracing::debug!(flag = def.long, description = def.description, "flag applies");
                    def.long.to_string()
                }),
        );
        self
    }

    /// Build the final argument list.
    pub fn build(self) -> ArgumentList {
        ArgumentList::from(self.args)
    }
}
