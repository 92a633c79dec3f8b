//! depsweep - find installed Python dependencies that a project never imports
//!
//! This crate inventories the packages installed in a Python environment,
//! collects the imports used by a source tree, optionally reads the
//! project's manifests, and reports installed packages that look unused.

pub mod analysis;
pub mod check;
pub mod config;
pub mod files;
pub mod inventory;
pub mod logging;
pub mod parser;
pub mod report;
