//! Parser module for depsweep.
//!
//! This module extracts declared dependency names from the manifest
//! formats found in Python projects.
//!
//! # Supported Formats
//!
//! - **pyproject.toml** - Poetry tables or PEP 621 `project.dependencies`
//! - **requirements.txt** - one requirement per line
//! - **environment.yml** - conda specs, including nested `pip:` lists
//!
//! The format is chosen by extension; anything else is rejected with
//! [`ParseError::UnsupportedFormat`].
//!
//! # Example
//!
//! ```ignore
//! use depsweep::parser::extract_files;
//!
//! let declared = extract_files(["pyproject.toml", "requirements-dev.txt"])?;
//! assert!(declared.contains("requests"));
//! ```

pub mod environment;
pub mod manifest;
pub mod names;
pub mod pyproject;
pub mod requirements;
pub mod types;

// Re-export commonly used types for convenience
pub use manifest::{extract_file, extract_files, ParseError, ParseResult};
pub use types::{DeclaredDependencies, ManifestFormat};
