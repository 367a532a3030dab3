//! Link Stripping Pipeline
//! Author: kartik4091
//! Created: 2025-06-05
//!
//! Runs the link stripping pass over a loaded document: per-page key
//! removal and content scrubbing, then catalog cleanup, pruning and save.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::cleaner::{ActionCleaner, ContentScrubber};
use crate::config::StripConfig;
use crate::error::Result;
use crate::pdf_document::{output_path_for, PdfDocument};
use crate::report::StripReport;
use crate::utils::{ensure_writable_output, ProgressSink, ProgressUpdate};

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: StripConfig,
    action_cleaner: ActionCleaner,
    scrubber: ContentScrubber,
}

impl Pipeline {
    /// Validates the configuration and compiles its patterns
    pub fn new(config: StripConfig) -> Result<Self> {
        config.validate()?;
        let action_cleaner = ActionCleaner::new(&config);
        let scrubber = ContentScrubber::new(&config)?;

        Ok(Self {
            config,
            action_cleaner,
            scrubber,
        })
    }

    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    pub fn scrubber(&self) -> &ContentScrubber {
        &self.scrubber
    }

    /// Default output location for `input` under this configuration
    pub fn output_path_for(&self, input: &Path) -> Result<PathBuf> {
        output_path_for(input, &self.config.output_prefix)
    }

    /// Strips links from a loaded document in place
    #[instrument(skip(self, doc, progress), fields(input = %doc.file_path.display()))]
    pub fn strip_document(&self, doc: &mut PdfDocument, progress: &dyn ProgressSink) -> Result<StripReport> {
        let mut report = StripReport::new(&doc.file_path);
        let page_ids = doc.page_ids();
        let total = page_ids.len();
        report.pages = total;
        info!("Stripping links from {} page(s)", total);

        let mut seen_streams = HashSet::new();
        for (index, page_id) in page_ids.into_iter().enumerate() {
            progress.report(&ProgressUpdate::page(index, total));

            let removed = self.action_cleaner.strip_page(doc, page_id)?;
            report.record_page_keys(&removed);

            if !self.config.scrub_content {
                continue;
            }
            // A page whose content cannot be processed keeps its content
            // and the pass goes on.
            match self.scrubber.scrub_page(doc, page_id, &mut seen_streams) {
                Ok(page) => {
                    report.streams_scrubbed += page.streams_scrubbed;
                    report.record_matches(&page.matches);
                }
                Err(e) => {
                    debug!("Content of page {} left unmodified: {}", index + 1, e);
                    report.pages_skipped.push(index + 1);
                }
            }
        }

        progress.report(&ProgressUpdate::catalog(total));
        report.root_keys_removed = self.action_cleaner.strip_catalog(doc)?;

        if self.config.prune_unreferenced {
            let pruned = doc.document.prune_objects();
            report.objects_pruned = pruned.len();
            debug!("Pruned {} unreferenced object(s)", pruned.len());
        }
        if self.config.compress_output {
            doc.document.compress();
        }

        if !report.pages_skipped.is_empty() {
            warn!(
                "Content of {} page(s) could not be processed and was left unmodified",
                report.pages_skipped.len()
            );
        }
        progress.report(&ProgressUpdate::complete(total));
        Ok(report)
    }

    /// Loads `input`, strips it and writes the result to `output`
    pub fn execute(&self, input: &Path, output: &Path, progress: &dyn ProgressSink) -> Result<StripReport> {
        ensure_writable_output(input, output, self.config.overwrite)?;

        let mut doc = PdfDocument::load(input)?;
        let mut report = self.strip_document(&mut doc, progress)?;
        doc.save(output)?;

        report.output = Some(output.to_path_buf());
        report.finish();
        info!("✅ {} -> {}: {}", input.display(), output.display(), report.summary_line());
        Ok(report)
    }

    /// Runs the pass without writing anything
    pub fn dry_run(&self, input: &Path, progress: &dyn ProgressSink) -> Result<StripReport> {
        let mut doc = PdfDocument::load(input)?;
        let mut report = self.strip_document(&mut doc, progress)?;
        report.finish();
        Ok(report)
    }

    /// Runs [`Pipeline::execute`] on the blocking thread pool so the caller's
    /// task stays responsive.
    pub async fn execute_in_background(
        self: Arc<Self>,
        input: PathBuf,
        output: PathBuf,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<StripReport> {
        tokio::task::spawn_blocking(move || self.execute(&input, &output, progress.as_ref())).await?
    }

    pub async fn dry_run_in_background(
        self: Arc<Self>,
        input: PathBuf,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<StripReport> {
        tokio::task::spawn_blocking(move || self.dry_run(&input, progress.as_ref())).await?
    }
}
