mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{EngineConfig, TargetDef, TargetFile, TargetKind};
