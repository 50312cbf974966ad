use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::mode::Mode;

/// A build-time switch with domain `{migrate, dry-run}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeFlag {
    pub name: String,
    /// Used when no define overrides the flag (default: migrate).
    #[serde(default)]
    pub default: Mode,
}

impl ModeFlag {
    pub fn new(name: impl Into<String>, default: Mode) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

/// Flag values for one evaluation, usually from `--define NAME=VALUE`.
///
/// Values stay raw strings until a [`ModeRegistry`](crate::mode::ModeRegistry)
/// resolves them, so an out-of-domain value is reported against the flag
/// that reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSettings {
    values: BTreeMap<String, String>,
}

impl BuildSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one value. A later value for the same name replaces the earlier one.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Parse `NAME=VALUE` defines in order; later defines win.
    pub fn parse_defines<I, S>(defines: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut settings = Self::new();
        for define in defines {
            let define = define.as_ref();
            let Some((name, value)) = define.split_once('=') else {
                return Err(ConfigError::MalformedDefine {
                    define: define.to_string(),
                });
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::MalformedDefine {
                    define: define.to_string(),
                });
            }
            if let Some(previous) = settings.values.insert(name.to_string(), value.to_string()) {
                tracing::debug!(flag = name, %previous, value, "define overrides earlier value");
            }
        }
        Ok(settings)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Defined names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
