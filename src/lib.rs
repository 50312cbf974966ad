//! copywire: bakes migration-engine invocations at evaluation time and
//! launches them later with caller-supplied trailing arguments.
//!
//! ```text
//! copywire.toml → evaluate → ModeRegistry → stage file → launch (+ trailing) → engine
//! ```

pub mod args;
pub mod config;
pub mod eval;
pub mod launcher;
pub mod logging;
pub mod mode;
pub mod stage;
pub mod validate;
pub mod workflow;
