//! Report module for the link stripping pass
//! Author: kartik4091
//! Created: 2025-06-05

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod formatter;
pub mod generator;

pub use formatter::ReportFormatter;
pub use generator::ReportGenerator;

/// Report configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_path: PathBuf,
    pub format: ReportFormat,
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    PlainText,
    Json,
    Yaml,
}

/// What one run of the pass did to one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripReport {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub pages: usize,
    /// Removal count per page key
    pub page_keys_removed: BTreeMap<String, usize>,
    pub root_keys_removed: Vec<String>,
    pub streams_scrubbed: usize,
    /// Removed matches per pattern label
    pub pattern_matches: BTreeMap<String, usize>,
    /// One-based numbers of pages whose content could not be processed
    pub pages_skipped: Vec<usize>,
    pub objects_pruned: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: u64,
}

impl StripReport {
    pub fn new(input: &Path) -> Self {
        Self {
            input: input.to_path_buf(),
            output: None,
            pages: 0,
            page_keys_removed: BTreeMap::new(),
            root_keys_removed: Vec::new(),
            streams_scrubbed: 0,
            pattern_matches: BTreeMap::new(),
            pages_skipped: Vec::new(),
            objects_pruned: 0,
            started_at: Utc::now(),
            finished_at: None,
            duration_ms: 0,
        }
    }

    pub fn record_page_keys(&mut self, keys: &[String]) {
        for key in keys {
            *self.page_keys_removed.entry(key.clone()).or_insert(0) += 1;
        }
    }

    pub fn record_matches(&mut self, matches: &BTreeMap<String, usize>) {
        for (label, count) in matches {
            *self.pattern_matches.entry(label.clone()).or_insert(0) += count;
        }
    }

    pub fn finish(&mut self) {
        let now = Utc::now();
        self.duration_ms = (now - self.started_at).num_milliseconds().max(0) as u64;
        self.finished_at = Some(now);
    }

    pub fn total_keys_removed(&self) -> usize {
        self.page_keys_removed.values().sum::<usize>() + self.root_keys_removed.len()
    }

    pub fn total_matches(&self) -> usize {
        self.pattern_matches.values().sum()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} page(s), {} dictionary entries removed, {} content match(es) in {} stream(s), {} page(s) skipped",
            self.pages,
            self.total_keys_removed(),
            self.total_matches(),
            self.streams_scrubbed,
            self.pages_skipped.len()
        )
    }
}

/// An input that could not be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedInput {
    pub input: PathBuf,
    pub error: String,
}

/// Everything one CLI invocation did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub reports: Vec<StripReport>,
    pub failures: Vec<FailedInput>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            reports: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn push_report(&mut self, report: StripReport) {
        self.reports.push(report);
    }

    pub fn push_failure(&mut self, input: &Path, error: impl ToString) {
        self.failures.push(FailedInput {
            input: input.to_path_buf(),
            error: error.to_string(),
        });
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accumulate() {
        let mut report = StripReport::new(Path::new("a.pdf"));
        report.record_page_keys(&["Annots".into(), "AA".into()]);
        report.record_page_keys(&["Annots".into()]);
        report.root_keys_removed.push("OpenAction".into());

        let mut matches = BTreeMap::new();
        matches.insert("http".to_string(), 2);
        report.record_matches(&matches);
        report.record_matches(&matches);

        assert_eq!(report.page_keys_removed["Annots"], 2);
        assert_eq!(report.total_keys_removed(), 4);
        assert_eq!(report.total_matches(), 4);
    }

    #[test]
    fn finish_stamps_time() {
        let mut report = StripReport::new(Path::new("a.pdf"));
        report.finish();
        let finished = report.finished_at.unwrap();
        assert!(finished >= report.started_at);
    }

    #[test]
    fn summary_tracks_failures() {
        let mut summary = RunSummary::new();
        assert!(summary.is_success());
        summary.push_failure(Path::new("broken.pdf"), "PDF error: invalid file header");
        assert!(!summary.is_success());
        assert_eq!(summary.failures[0].error, "PDF error: invalid file header");
    }
}
