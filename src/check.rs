//! The end-to-end unused-dependency check.
//!
//! Builds the inventory, collects used imports, reads manifests when any
//! were given, then reconciles the three.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::analysis::{collect_used_imports, AnalysisError};
use crate::inventory::{InventoryError, PackageSource};
use crate::parser::{extract_files, ParseError};
use crate::report::{Reconciler, Report};

/// Any error that aborts a check.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Manifest(#[from] ParseError),
}

impl CheckError {
    /// The path that was not found, if this is a missing-file error.
    pub fn missing_file(&self) -> Option<&Path> {
        match self {
            CheckError::Analysis(AnalysisError::FileNotFound { path })
            | CheckError::Manifest(ParseError::FileNotFound { path }) => Some(path),
            _ => None,
        }
    }
}

/// Inputs of a check.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Source files to scan for imports.
    pub sources: Vec<PathBuf>,
    /// Manifests to cross-check against; `None` disables the filter.
    pub manifests: Option<Vec<PathBuf>>,
    pub reconciler: Reconciler,
}

/// Run the check and return the report.
///
/// The report is only produced if every step succeeds.
pub fn check(source: &dyn PackageSource, options: &CheckOptions) -> Result<Report, CheckError> {
    let inventory = source.load()?;
    info!(packages = inventory.len(), "loaded installed packages");

    let used = collect_used_imports(&options.sources)?;
    info!(
        files = options.sources.len(),
        imports = used.len(),
        "collected used imports"
    );

    let declared = match &options.manifests {
        Some(manifests) => {
            let declared = extract_files(manifests)?;
            info!(
                manifests = manifests.len(),
                declared = declared.len(),
                "collected declared dependencies"
            );
            Some(declared)
        }
        None => None,
    };

    Ok(options
        .reconciler
        .reconcile(&inventory, &used, declared.as_ref()))
}
