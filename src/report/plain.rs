//! Plain-text report output.

use super::{Renderer, Report};
use std::io::{self, Write};

/// Line printed when nothing was flagged.
pub const NO_UNUSED_MESSAGE: &str = "No unused dependencies were found.";

/// Plain-text renderer implementation.
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render<W: Write>(&self, report: &Report, writer: &mut W) -> io::Result<()> {
        if !report.has_unused() {
            return writeln!(writer, "{}", NO_UNUSED_MESSAGE);
        }

        for finding in &report.findings {
            writeln!(writer, "'{}' is probably unused.", finding.package)?;
        }

        Ok(())
    }
}
