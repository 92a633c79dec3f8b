//! Expansion of user-supplied file specifications into concrete paths.
//!
//! A specification is one of:
//!
//! - a glob pattern (contains `*`, `?` or `[`)
//! - a directory, searched for `*.py` files
//! - anything else, passed through as a path even if it does not exist,
//!   so that the consumer reports it as missing

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of the source files picked up from directories.
const SOURCE_EXTENSION: &str = "py";

/// Errors from file specification expansion.
#[derive(Error, Debug)]
pub enum FileSpecError {
    #[error("Invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Expand source specifications.
///
/// With `recursive` off, directories are only searched one level deep and
/// `**` in a glob is collapsed to `*`. The result is sorted and free of
/// duplicates.
pub fn expand_sources<S: AsRef<str>>(
    specs: &[S],
    recursive: bool,
) -> Result<Vec<PathBuf>, FileSpecError> {
    let mut paths = Vec::new();

    for spec in specs {
        let spec = spec.as_ref();
        let path = Path::new(spec);
        if is_glob(spec) {
            paths.extend(expand_glob(spec, recursive)?);
        } else if path.is_dir() {
            paths.extend(walk_sources(path, recursive));
        } else {
            paths.push(path.to_path_buf());
        }
    }

    paths.sort();
    paths.dedup();
    debug!(count = paths.len(), "expanded source specifications");
    Ok(paths)
}

/// Expand manifest specifications. Globs are never recursive and
/// directories are not searched.
pub fn expand_manifests<S: AsRef<str>>(specs: &[S]) -> Result<Vec<PathBuf>, FileSpecError> {
    let mut paths = Vec::new();

    for spec in specs {
        let spec = spec.as_ref();
        if is_glob(spec) {
            paths.extend(expand_glob(spec, false)?);
        } else {
            paths.push(PathBuf::from(spec));
        }
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

fn is_glob(spec: &str) -> bool {
    spec.contains(['*', '?', '['])
}

fn expand_glob(spec: &str, recursive: bool) -> Result<Vec<PathBuf>, FileSpecError> {
    let pattern = if recursive {
        spec.to_string()
    } else {
        collapse_recursive_wildcards(spec)
    };

    let entries = glob::glob(&pattern).map_err(|source| FileSpecError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable path")
            }
        }
    }
    Ok(paths)
}

/// Replace every run of `**` with a single `*`.
fn collapse_recursive_wildcards(spec: &str) -> String {
    let mut collapsed = spec.to_string();
    while collapsed.contains("**") {
        collapsed = collapsed.replace("**", "*");
    }
    collapsed
}

/// All `*.py` files below `root`, skipping tooling and environment
/// directories.
fn walk_sources(root: &Path, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION))
        .map(|e| e.into_path())
        .collect()
}

/// Check if a directory should be ignored during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    matches!(
        name.as_ref(),
        ".git" | "__pycache__" | ".venv" | "venv" | "node_modules" | ".tox" | "build" | "dist"
    )
}
