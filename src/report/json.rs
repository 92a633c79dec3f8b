//! JSON report output.
//!
//! Emits the findings as a single document for machine consumption.

use super::{Renderer, Report};
use serde::Serialize;
use std::io::{self, Write};

/// JSON renderer implementation.
pub struct JsonRenderer;

/// Serializable finding for JSON output.
#[derive(Serialize)]
struct JsonFinding<'a> {
    package: &'a str,
    import_names: &'a [String],
}

/// Root JSON document.
#[derive(Serialize)]
struct JsonReport<'a> {
    has_unused: bool,
    unused: Vec<JsonFinding<'a>>,
}

impl Renderer for JsonRenderer {
    fn render<W: Write>(&self, report: &Report, writer: &mut W) -> io::Result<()> {
        let document = JsonReport {
            has_unused: report.has_unused(),
            unused: report
                .findings
                .iter()
                .map(|f| JsonFinding {
                    package: &f.package,
                    import_names: &f.import_names,
                })
                .collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &document)?;
        writeln!(writer)
    }
}
