//! Staged presets: the side channel between evaluation and launch.
//!
//! Format: UTF-8 text, one argument per line, every line terminated by
//! `\n`. No header, no quoting. An argument holding a line break cannot be
//! staged and is rejected at evaluation time.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::args::ArgumentList;
use crate::config::ConfigError;
use crate::launcher::LaunchError;

/// Environment variable naming the preset file for `launch`.
pub const PRESET_ENV: &str = "COPYWIRE_PRESET";

pub fn preset_path(out_dir: &Path, target: &str) -> PathBuf {
    out_dir.join(format!("{target}.args"))
}

pub fn info_path(out_dir: &Path, target: &str) -> PathBuf {
    out_dir.join(format!("{target}.info.json"))
}

/// Render a preset in stage format.
pub fn render(args: &ArgumentList) -> Result<String, ConfigError> {
    let mut out = String::new();
    for arg in args {
        if arg.contains(['\n', '\r']) {
            return Err(ConfigError::UnstageableArgument {
                argument: arg.clone(),
            });
        }
        out.push_str(arg);
        out.push('\n');
    }
    Ok(out)
}

/// Parse stage-format text. Tolerates CRLF line endings and a missing
/// final newline.
pub fn parse(content: &str) -> ArgumentList {
    if content.is_empty() {
        return ArgumentList::default();
    }
    let body = content.strip_suffix('\n').unwrap_or(content);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect::<Vec<_>>()
        .into()
}

/// Outcome of [`write_preset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existing file already had identical bytes; left untouched.
    Unchanged,
}

/// Write `rendered` to `path`, skipping the write when the bytes already
/// match so the file's mtime stays stable across identical evaluations.
pub fn write_preset(path: &Path, rendered: &str) -> io::Result<WriteOutcome> {
    if let Ok(existing) = fs::read(path) {
        if existing == rendered.as_bytes() {
            return Ok(WriteOutcome::Unchanged);
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    // Per-process temp name: concurrent bakes into one out dir must not
    // clobber each other's half-written file.
    let tmp = path.with_extension(format!("args.{}.tmp", std::process::id()));
    fs::write(&tmp, rendered)?;
    fs::rename(&tmp, path)?;
    Ok(WriteOutcome::Written)
}

/// Remove a previously staged preset. Returns whether a file was removed.
///
/// Used when a target fails evaluation, so a stale preset from an earlier
/// mode can no longer be launched.
pub fn remove_preset(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Read a staged preset. Fails if the file is absent, unreadable, or empty.
pub fn read_preset(path: &Path) -> Result<ArgumentList, LaunchError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LaunchError::PresetMissing {
                path: path.to_path_buf(),
            }
        } else {
            LaunchError::PresetUnreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let args = parse(&content);
    if args.is_empty() {
        return Err(LaunchError::EmptyPreset {
            path: path.to_path_buf(),
        });
    }
    Ok(args)
}
