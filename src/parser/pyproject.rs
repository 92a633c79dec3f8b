//! Parser for `pyproject.toml` manifests.
//!
//! Two layouts are understood. A non-empty `[tool.poetry]` table wins: its
//! dependency tables are keyed by package name. Otherwise the PEP 621
//! `project.dependencies` array of requirement strings is read.

use toml::Value;

use super::manifest::ParseResult;
use super::names::requirement_name;

/// Extracts declared dependency names from pyproject content.
///
/// A document with neither layout yields an empty list.
pub fn extract(content: &str) -> ParseResult<Vec<String>> {
    let doc: Value = toml::from_str(content)?;

    if let Some(poetry) = doc
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(Value::as_table)
        .filter(|t| !t.is_empty())
    {
        return Ok(poetry_dependencies(poetry));
    }

    if let Some(project) = doc.get("project") {
        let has_dependencies = project
            .get("dependencies")
            .and_then(Value::as_array)
            .is_some_and(|deps| !deps.is_empty());
        if has_dependencies {
            return Ok(project_dependencies(project));
        }
    }

    Ok(Vec::new())
}

/// Keys of `dependencies`, `dev-dependencies` and every
/// `group.<name>.dependencies` table.
fn poetry_dependencies(poetry: &toml::Table) -> Vec<String> {
    let mut names = Vec::new();

    for key in ["dependencies", "dev-dependencies"] {
        if let Some(deps) = poetry.get(key).and_then(Value::as_table) {
            names.extend(deps.keys().cloned());
        }
    }

    if let Some(groups) = poetry.get("group").and_then(Value::as_table) {
        for group in groups.values() {
            if let Some(deps) = group.get("dependencies").and_then(Value::as_table) {
                names.extend(deps.keys().cloned());
            }
        }
    }

    names
}

/// Requirement strings from `dependencies` and `optional-dependencies.*`.
fn project_dependencies(project: &Value) -> Vec<String> {
    let mut specs: Vec<&str> = Vec::new();

    if let Some(deps) = project.get("dependencies").and_then(Value::as_array) {
        specs.extend(deps.iter().filter_map(Value::as_str));
    }

    if let Some(extras) = project
        .get("optional-dependencies")
        .and_then(Value::as_table)
    {
        for deps in extras.values().filter_map(Value::as_array) {
            specs.extend(deps.iter().filter_map(Value::as_str));
        }
    }

    specs.into_iter().filter_map(requirement_name).collect()
}
