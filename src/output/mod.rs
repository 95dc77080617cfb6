// Output formatting: terminal charts and JSON export.

pub mod terminal;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::pipeline::analysis::AnalysisReport;

/// Build a fixed-width text bar for `value` scaled against `max`.
pub fn text_bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max > 0.0 {
        ((value / max) * width as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(width);
    format!("{}{}", "=".repeat(filled), " ".repeat(width - filled))
}

/// Write the report as pretty-printed JSON.
pub fn write_json_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}
