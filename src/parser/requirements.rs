//! Parser for flat `requirements.txt` style lists.

use once_cell::sync::Lazy;
use regex::Regex;

/// A line-start token that looks like a package name. This does not enforce
/// any naming rules; it only keeps option lines, comments and blank lines
/// from being captured.
static REQUIREMENT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\w+[-_\w+]*").expect("requirement token pattern is valid"));

/// Extracts every line-leading package token from a requirements file.
///
/// # Example
///
/// ```
/// use depsweep::parser::requirements::extract;
///
/// let names = extract("requests==2.31\n\n# tooling\nblack>=24\n-r dev.txt\n");
/// assert_eq!(names, vec!["requests", "black"]);
/// ```
pub fn extract(content: &str) -> Vec<String> {
    REQUIREMENT_TOKEN
        .find_iter(content.trim())
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_one_per_line() {
        let content = "numpy\npandas\n\n\nscikit-learn\n\ntyping_extensions\n";
        assert_eq!(
            extract(content),
            vec!["numpy", "pandas", "scikit-learn", "typing_extensions"]
        );
    }

    #[test]
    fn test_extract_strips_specifiers() {
        let content = r#"
requests==2.28.0
flask>=2.0.0
pandas~=1.5.0
uvicorn[standard]
"#;
        assert_eq!(extract(content), vec!["requests", "flask", "pandas", "uvicorn"]);
    }

    #[test]
    fn test_extract_skips_comments_and_options() {
        let content = r#"
# Python dependencies
--index-url https://pypi.org/simple
-r base.txt
-e .
httpx
"#;
        assert_eq!(extract(content), vec!["httpx"]);
    }

    #[test]
    fn test_extract_indented_first_line() {
        // Leading whitespace of the whole file is trimmed away.
        assert_eq!(extract("   rich\n"), vec!["rich"]);
    }

    #[test]
    fn test_extract_empty() {
        assert!(extract("").is_empty());
        assert!(extract("\n\n# nothing here\n").is_empty());
    }
}
