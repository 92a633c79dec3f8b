//! Reconciliation of installed packages against used imports.
//!
//! [`Reconciler::reconcile`] computes the findings; the [`plain`] and
//! [`json`] renderers turn a [`Report`] into output.

pub mod json;
pub mod plain;

use std::collections::BTreeSet;
use std::io::{self, Write};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::analysis::UsedImports;
use crate::inventory::Inventory;
use crate::parser::DeclaredDependencies;

/// Packaging tools and interpreter pseudo-entries that are never reported.
pub const DEFAULT_IGNORED: [&str; 5] = ["pip", "setuptools", "wheel", "python", "python_version"];

/// How a used import is matched against a package's import identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// The used import must equal the identifier: `requests.adapters` does
    /// not count as a use of `requests`.
    #[default]
    Exact,
    /// A used import also counts for every dotted parent of it:
    /// `requests.adapters` counts as a use of `requests`.
    Submodule,
}

impl MatchPolicy {
    fn is_used(&self, import_name: &str, used: &UsedImports) -> bool {
        match self {
            MatchPolicy::Exact => used.contains(import_name),
            MatchPolicy::Submodule => used.contains_module_or_submodule(import_name),
        }
    }
}

/// A single installed package that appears to be unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Installed package name.
    pub package: String,
    /// Import identifiers the package provides, none of which were used.
    pub import_names: Vec<String>,
}

/// The outcome of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Findings in package-name order.
    pub findings: Vec<Finding>,
}

impl Report {
    /// Returns true if any package was flagged.
    pub fn has_unused(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Names of the flagged packages.
    pub fn unused_packages(&self) -> impl Iterator<Item = &str> {
        self.findings.iter().map(|f| f.package.as_str())
    }
}

/// Computes unused packages.
#[derive(Debug, Clone)]
pub struct Reconciler {
    policy: MatchPolicy,
    ignored: BTreeSet<String>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    /// A reconciler with exact matching and the default ignore list.
    pub fn new() -> Self {
        Self {
            policy: MatchPolicy::default(),
            ignored: DEFAULT_IGNORED.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Never report these packages, in addition to [`DEFAULT_IGNORED`].
    pub fn ignore<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored
            .extend(packages.into_iter().map(|p| p.as_ref().to_lowercase()));
        self
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn is_ignored(&self, package: &str) -> bool {
        self.ignored.contains(&package.to_lowercase())
    }

    /// Find installed packages none of whose import identifiers is used.
    ///
    /// With `declared` given, a package is only reported if it is also
    /// declared in one of the manifests; this keeps unrelated packages in a
    /// shared environment out of the report.
    ///
    /// # Example
    ///
    /// ```
    /// use depsweep::analysis::UsedImports;
    /// use depsweep::inventory::Inventory;
    /// use depsweep::report::Reconciler;
    ///
    /// let inventory: Inventory = [("foo", ["foo"]), ("bar", ["bar"])].into_iter().collect();
    /// let used: UsedImports = ["foo"].into_iter().collect();
    ///
    /// let report = Reconciler::new().reconcile(&inventory, &used, None);
    /// assert_eq!(report.unused_packages().collect::<Vec<_>>(), vec!["bar"]);
    /// ```
    pub fn reconcile(
        &self,
        inventory: &Inventory,
        used: &UsedImports,
        declared: Option<&DeclaredDependencies>,
    ) -> Report {
        if declared.is_some_and(DeclaredDependencies::is_empty) {
            warn!("manifests declare no dependencies; nothing will be reported");
        }

        let findings: Vec<Finding> = inventory
            .iter()
            .filter(|(package, _)| !self.is_ignored(package))
            .filter(|(_, imports)| !imports.iter().any(|name| self.policy.is_used(name, used)))
            .filter(|(package, _)| declared.map_or(true, |d| d.contains(package)))
            .map(|(package, imports)| Finding {
                package: package.to_string(),
                import_names: imports.iter().cloned().collect(),
            })
            .collect();

        debug!(
            installed = inventory.len(),
            used = used.len(),
            unused = findings.len(),
            "reconciled dependencies"
        );

        Report { findings }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per finding
    #[default]
    Plain,
    /// JSON document - machine-readable
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown output format: '{}'. Valid formats: plain, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for report renderers.
pub trait Renderer {
    /// Render the report to the given writer.
    fn render<W: Write>(&self, report: &Report, writer: &mut W) -> io::Result<()>;
}

/// Render a report in the specified format.
pub fn render<W: Write>(format: OutputFormat, report: &Report, writer: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::PlainRenderer.render(report, writer),
        OutputFormat::Json => json::JsonRenderer.render(report, writer),
    }
}

/// Render a report to a string.
pub fn render_to_string(format: OutputFormat, report: &Report) -> io::Result<String> {
    let mut buffer = Vec::new();
    render(format, report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn inventory(entries: &[(&str, &[&str])]) -> Inventory {
        entries
            .iter()
            .map(|(name, imports)| (*name, imports.iter().copied()))
            .collect()
    }

    fn used(names: &[&str]) -> UsedImports {
        names.iter().copied().collect()
    }

    fn unused(report: &Report) -> Vec<&str> {
        report.unused_packages().collect()
    }

    #[test]
    fn test_used_package_not_reported() {
        let report =
            Reconciler::new().reconcile(&inventory(&[("foo", &["foo"])]), &used(&["foo"]), None);
        assert!(!report.has_unused());
    }

    #[test]
    fn test_unused_package_reported() {
        let report =
            Reconciler::new().reconcile(&inventory(&[("bar", &["bar"])]), &used(&[]), None);
        assert_eq!(unused(&report), vec!["bar"]);
        assert_eq!(report.findings[0].import_names, vec!["bar"]);
    }

    #[test]
    fn test_manifest_filter_suppresses_undeclared() {
        let declared: DeclaredDependencies = ["baz"].into_iter().collect();
        let report = Reconciler::new().reconcile(
            &inventory(&[("bar", &["bar"])]),
            &used(&[]),
            Some(&declared),
        );
        assert!(!report.has_unused());
    }

    #[test]
    fn test_manifest_filter_passes_declared() {
        let declared: DeclaredDependencies = ["bar"].into_iter().collect();
        let report = Reconciler::new().reconcile(
            &inventory(&[("bar", &["bar"])]),
            &used(&[]),
            Some(&declared),
        );
        assert_eq!(unused(&report), vec!["bar"]);
    }

    #[test]
    fn test_manifest_filter_is_case_insensitive() {
        let declared: DeclaredDependencies = ["pyyaml"].into_iter().collect();
        let report = Reconciler::new().reconcile(
            &inventory(&[("PyYAML", &["yaml", "_yaml"])]),
            &used(&[]),
            Some(&declared),
        );
        assert_eq!(unused(&report), vec!["PyYAML"]);
    }

    #[test]
    fn test_empty_declared_set_filters_everything() {
        let declared = DeclaredDependencies::new();
        let report = Reconciler::new().reconcile(
            &inventory(&[("bar", &["bar"])]),
            &used(&[]),
            Some(&declared),
        );
        assert!(!report.has_unused());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn reconcile_logged(declared: &DeclaredDependencies) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            Reconciler::new().reconcile(
                &inventory(&[("bar", &["bar"])]),
                &used(&[]),
                Some(declared),
            )
        });

        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_empty_declared_set_warns() {
        let output = reconcile_logged(&DeclaredDependencies::new());
        assert!(output.contains("manifests declare no dependencies"));

        let declared: DeclaredDependencies = ["bar"].into_iter().collect();
        let output = reconcile_logged(&declared);
        assert!(!output.contains("manifests declare no dependencies"));
    }

    #[test]
    fn test_any_import_name_counts_as_use() {
        let report = Reconciler::new().reconcile(
            &inventory(&[("attrs", &["attr", "attrs"])]),
            &used(&["attr"]),
            None,
        );
        assert!(!report.has_unused());
    }

    #[test]
    fn test_default_ignored_packages() {
        let entries: Vec<(&str, &[&str])> = DEFAULT_IGNORED
            .iter()
            .map(|name| (*name, &[][..]))
            .collect();
        let report = Reconciler::new().reconcile(&inventory(&entries), &used(&[]), None);
        assert!(!report.has_unused());
    }

    #[test]
    fn test_extra_ignored_packages() {
        let reconciler = Reconciler::new().ignore(["Black", "mypy"]);
        let report = reconciler.reconcile(
            &inventory(&[("black", &["black"]), ("mypy", &["mypy"]), ("rich", &["rich"])]),
            &used(&[]),
            None,
        );
        assert_eq!(unused(&report), vec!["rich"]);
    }

    #[test]
    fn test_exact_policy_ignores_submodule_use() {
        let report = Reconciler::new().reconcile(
            &inventory(&[("requests", &["requests"])]),
            &used(&["requests.adapters"]),
            None,
        );
        assert_eq!(unused(&report), vec!["requests"]);
    }

    #[test]
    fn test_submodule_policy_counts_submodule_use() {
        let reconciler = Reconciler::new().with_policy(MatchPolicy::Submodule);
        let report = reconciler.reconcile(
            &inventory(&[("requests", &["requests"]), ("req", &["req"])]),
            &used(&["requests.adapters"]),
            None,
        );
        assert_eq!(unused(&report), vec!["req"]);
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let inv = inventory(&[("zeta", &["zeta"]), ("alpha", &["alpha"]), ("mid", &["mid"])]);
        let used = used(&["mid"]);
        let reconciler = Reconciler::new();

        let first = reconciler.reconcile(&inv, &used, None);
        let second = reconciler.reconcile(&inv, &used, None);
        assert_eq!(first, second);
        assert_eq!(unused(&first), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(format!("{}", OutputFormat::Plain), "plain");
        assert_eq!(format!("{}", OutputFormat::Json), "json");
    }
}
