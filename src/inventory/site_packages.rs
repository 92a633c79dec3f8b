//! Installed-package discovery from site-packages directories.
//!
//! Each installed distribution leaves a `*.dist-info` or `*.egg-info`
//! entry behind. Its `top_level.txt`, when present, lists the importable
//! top-level names, one per line.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, warn};

use super::types::Inventory;

/// Suffix shared by all installed-metadata entries.
const METADATA_SUFFIX: &str = "-info";

/// Name of the per-package file listing its import identifiers.
const TOP_LEVEL_FILE: &str = "top_level.txt";

/// Python snippet printing `site.getsitepackages()` as a JSON array.
const DISCOVERY_SNIPPET: &str = "import json, site; print(json.dumps(site.getsitepackages()))";

/// Errors that can occur while building the inventory.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to query site-packages from `{interpreter}`: {reason}")]
    Discovery { interpreter: String, reason: String },
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// A source of installed-package information.
///
/// The real environment is one implementation; tests substitute fixtures.
pub trait PackageSource {
    /// Build the inventory.
    fn load(&self) -> InventoryResult<Inventory>;
}

impl PackageSource for Inventory {
    fn load(&self) -> InventoryResult<Inventory> {
        Ok(self.clone())
    }
}

/// Reads installed packages from a list of site-packages directories.
#[derive(Debug, Clone, Default)]
pub struct SitePackages {
    dirs: Vec<PathBuf>,
}

impl SitePackages {
    /// Use exactly these directories.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Ask `interpreter` for its site-packages directories.
    pub fn discover(interpreter: &str) -> InventoryResult<Self> {
        let discovery_error = |reason: String| InventoryError::Discovery {
            interpreter: interpreter.to_string(),
            reason,
        };

        let output = Command::new(interpreter)
            .args(["-c", DISCOVERY_SNIPPET])
            .output()
            .map_err(|e| discovery_error(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(discovery_error(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let dirs: Vec<PathBuf> =
            serde_json::from_slice(&output.stdout).map_err(|e| discovery_error(e.to_string()))?;
        debug!(interpreter, ?dirs, "discovered site-packages");

        Ok(Self::new(dirs))
    }

    /// The directories that will be scanned.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl PackageSource for SitePackages {
    fn load(&self) -> InventoryResult<Inventory> {
        let mut inventory = Inventory::new();

        for dir in &self.dirs {
            if !dir.is_dir() {
                warn!(path = %dir.display(), "site-packages directory does not exist, skipping");
                continue;
            }
            scan_site_dir(dir, &mut inventory)?;
        }

        debug!(packages = inventory.len(), "built installed-package inventory");
        Ok(inventory)
    }
}

/// Derive the package name from a metadata entry name.
///
/// The final extension (`.dist-info`, `.egg-info`) is dropped, then
/// everything from the first hyphen on, which removes the version:
/// `requests-2.31.0.dist-info` becomes `requests`.
///
/// This assumes the name itself contains no hyphen. Wheels normalize
/// hyphens to underscores in this position, but older `egg-info` entries
/// may not, so `my-pkg-1.0.egg-info` is read as `my`.
///
/// # Example
///
/// ```
/// use depsweep::inventory::package_name_from_metadata_dir;
///
/// assert_eq!(package_name_from_metadata_dir("PyYAML-6.0.1.dist-info"), Some("PyYAML"));
/// assert_eq!(package_name_from_metadata_dir("six.egg-info"), Some("six"));
/// ```
pub fn package_name_from_metadata_dir(entry_name: &str) -> Option<&str> {
    let stem = match entry_name.rfind('.') {
        Some(idx) if idx > 0 => &entry_name[..idx],
        _ => entry_name,
    };
    stem.split('-').next().filter(|name| !name.is_empty())
}

/// Add every metadata entry directly inside `dir` to `inventory`.
fn scan_site_dir(dir: &Path, inventory: &mut Inventory) -> InventoryResult<()> {
    let read_error = |source| InventoryError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_name = entry.file_name();
        let Some(entry_name) = file_name.to_str() else {
            continue;
        };
        if !entry_name.ends_with(METADATA_SUFFIX) {
            continue;
        }
        let Some(package) = package_name_from_metadata_dir(entry_name) else {
            continue;
        };

        let imports = read_top_level(&entry.path())?;
        inventory.add(package, imports);
    }

    Ok(())
}

/// Non-empty lines of `top_level.txt`, or nothing if the file is absent.
///
/// `egg-info` entries can be plain files rather than directories; those
/// simply have no `top_level.txt`.
fn read_top_level(metadata: &Path) -> InventoryResult<Vec<String>> {
    let path = metadata.join(TOP_LEVEL_FILE);
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path).map_err(|source| InventoryError::Read {
        path: path.clone(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
