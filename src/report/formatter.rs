//! Report formatter implementation
//! Author: kartik4091
//! Created: 2025-06-05

use super::{ReportFormat, RunSummary, StripReport};
use crate::error::{Error, Result};

/// Formats run summaries into the supported output formats
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn format(data: &RunSummary, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::PlainText => Ok(Self::to_text(data)),
            ReportFormat::Json => Self::to_json(data),
            ReportFormat::Yaml => Self::to_yaml(data),
        }
    }

    fn to_text(data: &RunSummary) -> String {
        let mut output = String::new();
        output.push_str("PDF Link Removal Report\n");
        output.push_str("=======================\n\n");
        output.push_str(&format!("Generated: {}\n", data.generated_at.to_rfc3339()));
        output.push_str(&format!("Version: {}\n", data.tool_version));
        output.push_str(&format!(
            "Processed: {}, Failed: {}\n\n",
            data.reports.len(),
            data.failures.len()
        ));

        for report in &data.reports {
            output.push_str(&Self::report_block(report));
            output.push('\n');
        }

        if !data.failures.is_empty() {
            output.push_str("Failures:\n");
            output.push_str("---------\n");
            for failure in &data.failures {
                output.push_str(&format!("{}: {}\n", failure.input.display(), failure.error));
            }
        }

        output
    }

    fn report_block(report: &StripReport) -> String {
        let mut block = format!("{}\n", report.input.display());
        if let Some(output) = &report.output {
            block.push_str(&format!("  -> {}\n", output.display()));
        }
        block.push_str(&format!("  {}\n", report.summary_line()));
        for (key, count) in &report.page_keys_removed {
            block.push_str(&format!("  /{} removed from {} page(s)\n", key, count));
        }
        if !report.root_keys_removed.is_empty() {
            block.push_str(&format!("  catalog: /{}\n", report.root_keys_removed.join(" /")));
        }
        for (label, count) in &report.pattern_matches {
            block.push_str(&format!("  {}: {}\n", label, count));
        }
        if !report.pages_skipped.is_empty() {
            let pages: Vec<String> = report.pages_skipped.iter().map(|p| p.to_string()).collect();
            block.push_str(&format!("  content left unmodified on page(s) {}\n", pages.join(", ")));
        }
        block
    }

    fn to_json(data: &RunSummary) -> Result<String> {
        serde_json::to_string_pretty(data).map_err(|e| Error::ReportError(e.to_string()))
    }

    fn to_yaml(data: &RunSummary) -> Result<String> {
        serde_yaml::to_string(data).map_err(|e| Error::ReportError(e.to_string()))
    }
}
