//! Source code analysis module for depsweep.
//!
//! This module parses Python source files with tree-sitter and collects
//! the set of modules they import.
//!
//! # Features
//!
//! - `import a.b.c` and `import a as b` statements
//! - `from x.y import z`, including relative `from .x import z`
//! - Imports nested anywhere (functions, `try` blocks, conditionals)
//! - Files with syntax errors are rejected instead of half-analyzed
//!
//! # Example
//!
//! ```ignore
//! use depsweep::analysis::collect_used_imports;
//!
//! let used = collect_used_imports(["app/main.py", "app/models.py"])?;
//! for name in used.iter() {
//!     println!("{}", name);
//! }
//! ```

pub mod imports;

// Re-export main types for convenience
pub use imports::{
    collect_used_imports, AnalysisError, AnalysisResult, ImportAnalyzer, UsedImports,
};
