//! Name normalization for manifest entries.
//!
//! Every manifest family reduces an entry to a bare distribution name
//! through one of these functions. They are deliberately permissive: an
//! entry may over-capture, but a legitimate name must never be lost.

/// Characters that end the name part of a requirement specifier.
///
/// `[` opens extras, `=`, `<`, `>`, `~` and `!` start version clauses,
/// `;` starts an environment marker and `@` a direct URL reference.
const SPECIFIER_DELIMITERS: [char; 8] = ['[', '=', '<', '>', '~', '!', ';', '@'];

/// Characters that end the repository name in a VCS URL segment.
const VCS_DELIMITERS: [char; 3] = ['.', '@', '#'];

/// Reduces a requirement specifier to its bare name.
///
/// Carets are stripped from both ends first (Poetry-style constraints
/// occasionally leak into PEP 621 lists), then everything from the first
/// specifier delimiter or whitespace onwards is dropped.
///
/// # Example
///
/// ```
/// use depsweep::parser::names::requirement_name;
///
/// assert_eq!(requirement_name("requests>=2.0").as_deref(), Some("requests"));
/// assert_eq!(requirement_name("flask[async]").as_deref(), Some("flask"));
/// assert_eq!(requirement_name(""), None);
/// ```
pub fn requirement_name(entry: &str) -> Option<String> {
    let entry = entry.trim().trim_matches('^');
    let end = entry
        .find(|c: char| SPECIFIER_DELIMITERS.contains(&c) || c.is_whitespace())
        .unwrap_or(entry.len());

    let name = entry[..end].trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Reduces a conda (or pip-within-conda) string entry to its bare name.
///
/// Entries that do not start with an alphabetic character are skipped,
/// which filters out directives such as `-e .` or `--index-url ...`.
pub fn conda_name(entry: &str) -> Option<String> {
    let entry = entry.trim();
    if !entry.chars().next()?.is_alphabetic() {
        return None;
    }
    requirement_name(entry)
}

/// Extracts the package name from a VCS requirement such as
/// `git+https://host/org/pkg.git@v1`.
///
/// The last path segment is taken and cut at the first `.`, `@` or `#`,
/// removing the `.git` suffix, revision pins and `#egg=` fragments.
pub fn vcs_name(url: &str) -> Option<String> {
    let segment = url.trim().trim_end_matches('/').rsplit('/').next()?;
    let end = segment.find(VCS_DELIMITERS).unwrap_or(segment.len());

    let name = &segment[..end];
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_name_version_clauses() {
        assert_eq!(requirement_name("requests>=2.0").as_deref(), Some("requests"));
        assert_eq!(requirement_name("numpy==1.26.4").as_deref(), Some("numpy"));
        assert_eq!(requirement_name("pandas<3").as_deref(), Some("pandas"));
        assert_eq!(requirement_name("attrs~=23.1").as_deref(), Some("attrs"));
        assert_eq!(requirement_name("django!=4.0").as_deref(), Some("django"));
    }

    #[test]
    fn test_requirement_name_extras_markers_and_urls() {
        assert_eq!(requirement_name("flask[extra]").as_deref(), Some("flask"));
        assert_eq!(
            requirement_name(r#"tomli ; python_version < "3.11""#).as_deref(),
            Some("tomli")
        );
        assert_eq!(
            requirement_name("mylib @ https://example.com/mylib.zip").as_deref(),
            Some("mylib")
        );
        assert_eq!(requirement_name("  rich >= 13  ").as_deref(), Some("rich"));
    }

    #[test]
    fn test_requirement_name_strips_carets() {
        assert_eq!(requirement_name("^httpx").as_deref(), Some("httpx"));
        assert_eq!(requirement_name("httpx^").as_deref(), Some("httpx"));
    }

    #[test]
    fn test_requirement_name_empty() {
        assert_eq!(requirement_name(""), None);
        assert_eq!(requirement_name(">=1.0"), None);
        assert_eq!(requirement_name("^"), None);
    }

    #[test]
    fn test_conda_name() {
        assert_eq!(conda_name("python=3.11").as_deref(), Some("python"));
        assert_eq!(conda_name("scipy>=1.10").as_deref(), Some("scipy"));
        assert_eq!(conda_name("-e ."), None);
        assert_eq!(conda_name("--index-url https://pypi.org"), None);
        assert_eq!(conda_name("3dlib"), None);
        assert_eq!(conda_name(""), None);
    }

    #[test]
    fn test_vcs_name() {
        assert_eq!(
            vcs_name("git+https://host/org/pkg.git@v1").as_deref(),
            Some("pkg")
        );
        assert_eq!(
            vcs_name("git+https://github.com/org/tool#egg=tool").as_deref(),
            Some("tool")
        );
        assert_eq!(
            vcs_name("git+ssh://git@github.com/org/lib@main").as_deref(),
            Some("lib")
        );
        assert_eq!(vcs_name("git+https://host/org/pkg/").as_deref(), Some("pkg"));
        assert_eq!(vcs_name("git+https://host/org/.hidden"), None);
    }
}
