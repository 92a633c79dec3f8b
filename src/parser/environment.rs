//! Parser for conda `environment.yml` specs.

use serde_yaml::Value;

use super::manifest::ParseResult;
use super::names::{conda_name, vcs_name};

/// Extracts declared dependency names from an environment spec.
///
/// Plain string entries under `dependencies` are conda specs. A mapping
/// entry with a `pip` list contributes its pip requirements, where
/// `git...` entries are VCS URLs. Anything else is skipped.
pub fn extract(content: &str) -> ParseResult<Vec<String>> {
    let doc: Value = serde_yaml::from_str(content)?;

    let Some(entries) = doc.get("dependencies").and_then(Value::as_sequence) else {
        return Ok(Vec::new());
    };

    let mut names = Vec::new();
    for entry in entries {
        match entry {
            Value::String(spec) => names.extend(conda_name(spec)),
            Value::Mapping(_) => {
                if let Some(pip) = entry.get("pip").and_then(Value::as_sequence) {
                    names.extend(pip.iter().filter_map(Value::as_str).filter_map(pip_name));
                }
            }
            _ => {}
        }
    }

    Ok(names)
}

fn pip_name(spec: &str) -> Option<String> {
    if spec.starts_with("git") {
        vcs_name(spec)
    } else {
        conda_name(spec)
    }
}
