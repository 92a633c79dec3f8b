//! Import analysis using tree-sitter for Python.
//!
//! This module parses source files and collects the module names named by
//! `import` and `from ... import` statements anywhere in the tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use tree_sitter::{Node, Parser, Tree, TreeCursor};

/// Errors that can occur during import analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No such file: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {0}")]
    FileRead(#[from] io::Error),

    #[error("Invalid syntax in {} at line {line}", path.display())]
    Syntax { path: PathBuf, line: usize },

    #[error("Failed to parse file: {}", path.display())]
    ParseError { path: PathBuf },

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// The set of import identifiers used by a source tree.
///
/// Dotted names are kept whole: `import a.b.c` records `a.b.c`, not `a`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedImports {
    names: BTreeSet<String>,
}

impl UsedImports {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Exact membership.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// True if `name` itself or any dotted submodule of it (`name.x...`)
    /// was imported.
    pub fn contains_module_or_submodule(&self, name: &str) -> bool {
        self.names
            .range(name.to_string()..)
            .take_while(|used| used.starts_with(name))
            .any(|used| used.len() == name.len() || used.as_bytes()[name.len()] == b'.')
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over the names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> Extend<S> for UsedImports {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for UsedImports {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut used = Self::new();
        used.extend(iter);
        used
    }
}

/// Analyzer for extracting imports from Python source files.
pub struct ImportAnalyzer {
    parser: Parser,
}

impl ImportAnalyzer {
    /// Create a new ImportAnalyzer.
    pub fn new() -> AnalysisResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|_| AnalysisError::LanguageInit)?;

        Ok(Self { parser })
    }

    /// Analyze a single file and return the modules it imports.
    pub fn analyze_file(&mut self, path: &Path) -> AnalysisResult<Vec<String>> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AnalysisError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => AnalysisError::FileRead(e),
        })?;
        self.analyze_source(&content, path)
    }

    /// Analyze source code directly. `path` is only used for error reporting.
    ///
    /// Source that Python 3 would not accept is rejected with
    /// [`AnalysisError::Syntax`] rather than analyzed partially. Beyond
    /// grammar errors this covers Python 2 `print`/`exec` statements and
    /// indentation whose meaning depends on the tab width.
    pub fn analyze_source(&mut self, source: &str, path: &Path) -> AnalysisResult<Vec<String>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::ParseError {
                path: path.to_path_buf(),
            })?;

        let root = tree.root_node();
        let error_line = if root.has_error() {
            Some(first_error_line(root))
        } else {
            first_legacy_statement_line(root)
                .or_else(|| inconsistent_indent_line(&line_indents(root, source)))
        };
        if let Some(line) = error_line {
            return Err(AnalysisError::Syntax {
                path: path.to_path_buf(),
                line,
            });
        }

        Ok(self.extract_imports(&tree, source))
    }

    /// Extract imports from a parsed tree.
    fn extract_imports(&self, tree: &Tree, source: &str) -> Vec<String> {
        let mut imports = Vec::new();
        let mut cursor = tree.root_node().walk();

        self.visit_node(&mut cursor, source, &mut imports);

        imports
    }

    /// Recursively visit nodes to find imports.
    fn visit_node(&self, cursor: &mut TreeCursor, source: &str, imports: &mut Vec<String>) {
        let node = cursor.node();

        match node.kind() {
            "import_statement" => self.parse_import(&node, source, imports),
            "import_from_statement" => {
                if let Some(module) = self.parse_from_import(&node, source) {
                    imports.push(module);
                }
            }
            "future_import_statement" => imports.push("__future__".to_string()),
            _ => {}
        }

        if cursor.goto_first_child() {
            loop {
                self.visit_node(cursor, source, imports);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }
    }

    /// `import a.b, c as d` yields `a.b` and `c`.
    fn parse_import(&self, node: &Node, source: &str, imports: &mut Vec<String>) {
        let mut cursor = node.walk();

        for name in node.children_by_field_name("name", &mut cursor) {
            let dotted = match name.kind() {
                "dotted_name" => Some(name),
                "aliased_import" => name.child_by_field_name("name"),
                _ => None,
            };
            if let Some(module) = dotted.and_then(|n| self.dotted_name(&n, source)) {
                imports.push(module);
            }
        }
    }

    /// `from x.y import z` yields `x.y`; `from .x import z` yields `x`;
    /// `from . import z` yields nothing.
    fn parse_from_import(&self, node: &Node, source: &str) -> Option<String> {
        let module = node.child_by_field_name("module_name")?;

        match module.kind() {
            "dotted_name" => self.dotted_name(&module, source),
            "relative_import" => {
                let mut cursor = module.walk();
                let dotted = module
                    .named_children(&mut cursor)
                    .find(|child| child.kind() == "dotted_name")?;
                self.dotted_name(&dotted, source)
            }
            _ => None,
        }
    }

    /// Rebuild a dotted name from its identifier parts.
    fn dotted_name(&self, node: &Node, source: &str) -> Option<String> {
        let mut cursor = node.walk();
        let parts: Vec<&str> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "identifier")
            .filter_map(|child| self.node_text(&child, source))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        }
    }

    /// Extract the text content of a node.
    fn node_text<'a>(&self, node: &Node, source: &'a str) -> Option<&'a str> {
        source.get(node.start_byte()..node.end_byte())
    }
}

/// 1-indexed line of the first ERROR or MISSING node below `node`.
fn first_error_line(node: Node) -> usize {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_error() || child.is_missing() {
            return child.start_position().row + 1;
        }
        if child.has_error() {
            return first_error_line(child);
        }
    }
    node.start_position().row + 1
}

/// Statements the grammar still accepts from Python 2.
const LEGACY_STATEMENTS: [&str; 2] = ["print_statement", "exec_statement"];

/// Clauses of a compound statement that begin their own logical line.
const LINE_CLAUSES: [&str; 6] = [
    "elif_clause",
    "else_clause",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "case_clause",
];

const TAB_SIZE: usize = 8;

/// 1-indexed line of the first Python 2 only statement below `node`.
fn first_legacy_statement_line(node: Node) -> Option<usize> {
    if LEGACY_STATEMENTS.contains(&node.kind()) {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let line = node.children(&mut cursor).find_map(first_legacy_statement_line);
    line
}

/// Indentation of every logical line start, keyed by row.
///
/// Each width is measured twice: with tabs advancing to the next multiple
/// of eight columns, and with tabs counting as one column.
fn line_indents(root: Node, source: &str) -> BTreeMap<usize, (usize, usize)> {
    let mut indents = BTreeMap::new();
    let mut pending = vec![root];

    while let Some(node) = pending.pop() {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if starts_logical_line(&node, &child) {
                if let Some(indent) = leading_indent(&child, source) {
                    indents.entry(child.start_position().row).or_insert(indent);
                }
            }
            pending.push(child);
        }
    }

    indents
}

fn starts_logical_line(parent: &Node, child: &Node) -> bool {
    if child.kind() == "comment" {
        return false;
    }
    matches!(parent.kind(), "module" | "block" | "decorated_definition")
        || LINE_CLAUSES.contains(&child.kind())
}

/// `None` when something other than whitespace precedes `node` on its line.
fn leading_indent(node: &Node, source: &str) -> Option<(usize, usize)> {
    let start = node.start_byte();
    let line_start = start.checked_sub(node.start_position().column)?;
    let prefix = source.get(line_start..start)?;

    let (mut col, mut alt) = (0, 0);
    for ch in prefix.chars() {
        match ch {
            ' ' => {
                col += 1;
                alt += 1;
            }
            '\t' => {
                col = (col / TAB_SIZE + 1) * TAB_SIZE;
                alt += 1;
            }
            '\x0c' => {
                col = 0;
                alt = 0;
            }
            _ => return None,
        }
    }
    Some((col, alt))
}

/// 1-indexed line whose indentation depends on the tab width, or that
/// dedents to a level no enclosing block opened.
fn inconsistent_indent_line(indents: &BTreeMap<usize, (usize, usize)>) -> Option<usize> {
    let mut levels = vec![(0, 0)];

    for (&row, &(col, alt)) in indents {
        while levels.len() > 1 && levels.last().is_some_and(|&(top, _)| col < top) {
            levels.pop();
        }
        let (top, top_alt) = levels.last().copied().unwrap_or((0, 0));

        if col > top {
            if alt <= top_alt {
                return Some(row + 1);
            }
            levels.push((col, alt));
        } else if col != top || alt != top_alt {
            return Some(row + 1);
        }
    }

    None
}

/// Analyze every file and collect the union of their imports.
///
/// The first unreadable or unparsable file aborts the whole collection.
pub fn collect_used_imports<I, P>(paths: I) -> AnalysisResult<UsedImports>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut analyzer = ImportAnalyzer::new()?;
    let mut used = UsedImports::new();

    for path in paths {
        let path = path.as_ref();
        let imports = analyzer.analyze_file(path)?;
        debug!(path = %path.display(), count = imports.len(), "analyzed source file");
        used.extend(imports);
    }

    Ok(used)
}
