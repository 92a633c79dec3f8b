//! Configuration loading from depsweep.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

use crate::report::OutputFormat;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "depsweep.toml";

/// Main configuration structure for depsweep.toml.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Packages never reported, in addition to the built-in list.
    pub ignore: Vec<String>,
    /// Site-packages directories to scan instead of asking the interpreter.
    pub site_packages: Vec<PathBuf>,
    /// Interpreter used for site-packages discovery.
    pub python: Option<String>,
    /// Count `import pkg.sub` as a use of `pkg`.
    pub match_submodules: bool,
    /// Report format: "plain" or "json".
    pub format: Option<OutputFormat>,
}

/// Loads configuration from `path` if it exists.
pub fn load_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(Some(cfg))
}
