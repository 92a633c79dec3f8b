//! Shared types for manifest parsing.
//!
//! This module defines the manifest format families and the normalized
//! set of dependency names extracted from them.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// The manifest family a file belongs to, chosen by file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `pyproject.toml` style structured project manifest.
    PyProject,

    /// Flat `requirements.txt` style list.
    Requirements,

    /// Conda `environment.yml` spec.
    CondaEnvironment,

    /// Any other extension. Carries the extension as found (possibly empty).
    Unsupported(String),
}

impl ManifestFormat {
    /// Determine the format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "toml" => ManifestFormat::PyProject,
            "txt" => ManifestFormat::Requirements,
            "yml" | "yaml" => ManifestFormat::CondaEnvironment,
            _ => ManifestFormat::Unsupported(ext.to_string()),
        }
    }

    /// Determine the format of the file at `path`.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        Self::from_extension(ext)
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestFormat::PyProject => write!(f, "pyproject"),
            ManifestFormat::Requirements => write!(f, "requirements"),
            ManifestFormat::CondaEnvironment => write!(f, "conda environment"),
            ManifestFormat::Unsupported(ext) => write!(f, "unsupported (.{})", ext),
        }
    }
}

/// The set of dependency names declared across one or more manifests.
///
/// Names are stored lower-cased; lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredDependencies {
    names: BTreeSet<String>,
}

impl DeclaredDependencies {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name, normalizing its case.
    pub fn insert(&mut self, name: impl AsRef<str>) {
        self.names.insert(name.as_ref().to_lowercase());
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over the normalized names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> Extend<S> for DeclaredDependencies {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name);
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for DeclaredDependencies {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut deps = Self::new();
        deps.extend(iter);
        deps
    }
}
