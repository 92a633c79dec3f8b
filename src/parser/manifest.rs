//! Manifest dispatch: picks a handler by file extension and merges the
//! names from every manifest into one [`DeclaredDependencies`] set.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::{DeclaredDependencies, ManifestFormat};
use super::{environment, pyproject, requirements};

/// Errors that can occur during manifest parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The manifest path does not exist.
    #[error("No such file: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] io::Error),

    /// Failed to parse TOML content.
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to parse YAML content.
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension is not one of the supported manifest families.
    #[error("Unknown file extension {extension:?} for manifest {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Extracts the declared dependency names from a single manifest.
///
/// The returned names are as written in the manifest; case normalization
/// happens when they are collected into [`DeclaredDependencies`].
pub fn extract_file(path: &Path) -> ParseResult<Vec<String>> {
    let format = ManifestFormat::from_path(path);
    debug!(path = %path.display(), %format, "reading manifest");

    match format {
        ManifestFormat::PyProject => pyproject::extract(&read_manifest(path)?),
        ManifestFormat::Requirements => Ok(requirements::extract(&read_manifest(path)?)),
        ManifestFormat::CondaEnvironment => environment::extract(&read_manifest(path)?),
        ManifestFormat::Unsupported(extension) => Err(ParseError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        }),
    }
}

/// Extracts and merges declared dependency names from every manifest.
///
/// The first failing manifest aborts the whole call; no partial set is
/// returned.
///
/// # Example
///
/// ```
/// use depsweep::parser::{extract_files, ParseError};
///
/// let result = extract_files(["Pipfile.lock"]);
/// assert!(matches!(result, Err(ParseError::UnsupportedFormat { .. })));
/// ```
pub fn extract_files<I, P>(paths: I) -> ParseResult<DeclaredDependencies>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut declared = DeclaredDependencies::new();
    for path in paths {
        declared.extend(extract_file(path.as_ref())?);
    }
    debug!(count = declared.len(), "collected declared dependencies");
    Ok(declared)
}

fn read_manifest(path: &Path) -> ParseResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ParseError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ParseError::IoError(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_extract_file_dispatches_by_extension() {
        let dir = TempDir::new().unwrap();
        let toml = write(
            &dir,
            "pyproject.toml",
            "[project]\ndependencies = [\"Requests>=2\"]\n",
        );
        let txt = write(&dir, "requirements.txt", "numpy\n");
        let yml = write(&dir, "environment.yml", "dependencies:\n  - scipy\n");

        assert_eq!(extract_file(&toml).unwrap(), vec!["Requests"]);
        assert_eq!(extract_file(&txt).unwrap(), vec!["numpy"]);
        assert_eq!(extract_file(&yml).unwrap(), vec!["scipy"]);
    }

    #[test]
    fn test_extract_files_merges_and_normalizes() {
        let dir = TempDir::new().unwrap();
        let toml = write(
            &dir,
            "pyproject.toml",
            "[project]\ndependencies = [\"Requests>=2\", \"flask\"]\n",
        );
        let txt = write(&dir, "requirements-dev.txt", "flask\npytest\n");

        let declared = extract_files([&toml, &txt]).unwrap();
        assert_eq!(
            declared.iter().collect::<Vec<_>>(),
            vec!["flask", "pytest", "requests"]
        );
    }

    #[test]
    fn test_unsupported_extension_fails_without_partial_result() {
        let dir = TempDir::new().unwrap();
        let txt = write(&dir, "requirements.txt", "numpy\n");
        let cfg = write(&dir, "setup.cfg", "[options]\n");

        let result = extract_files([&txt, &cfg]);
        match result {
            Err(ParseError::UnsupportedFormat { path, extension }) => {
                assert_eq!(path, cfg);
                assert_eq!(extension, "cfg");
            }
            other => panic!("expected unsupported format, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("requirements.txt");

        let result = extract_file(&missing);
        assert!(matches!(
            result.unwrap_err(),
            ParseError::FileNotFound { path } if path == missing
        ));
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::UnsupportedFormat {
            path: PathBuf::from("deps.ini"),
            extension: "ini".to_string(),
        };
        assert!(err.to_string().contains("Unknown file extension"));
        assert!(err.to_string().contains("deps.ini"));

        let err = ParseError::FileNotFound {
            path: PathBuf::from("missing.txt"),
        };
        assert_eq!(err.to_string(), "No such file: missing.txt");
    }
}
