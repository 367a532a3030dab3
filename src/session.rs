//! Processing session
//! Author: kartik4091
//!
//! Holds what a front end needs between user actions: the selected file,
//! where the output goes, the running log and the progress shown to the
//! user. One session handles one file at a time.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::pdf_document::output_path_for;
use crate::pipeline::Pipeline;
use crate::report::StripReport;
use crate::utils::{is_pdf_path, ProgressSink, ProgressUpdate, StripStage};

pub const READY_LOG: &str = "Ready.";
pub const READY_STATUS: &str = "Ready";
pub const DONE_STATUS: &str = "Done!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub percent: u8,
    pub status: String,
}

/// Progress shared between the session and the background worker
#[derive(Debug)]
pub struct ProgressState {
    inner: Mutex<ProgressSnapshot>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ProgressSnapshot {
                percent: 0,
                status: READY_STATUS.to_string(),
            }),
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.inner.lock().clone()
    }

    pub fn set(&self, percent: u8, status: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.percent = percent;
        inner.status = status.into();
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressState {
    fn report(&self, update: &ProgressUpdate) {
        let mut inner = self.inner.lock();
        inner.percent = update.percent();
        if update.stage == StripStage::Pages {
            inner.status = format!("Processing page {} of {}", update.completed + 1, update.total);
        }
        debug!("{} ({}%)", inner.status, inner.percent);
    }
}

#[derive(Debug)]
pub struct Session {
    selected_file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    output_file: Option<PathBuf>,
    log: Vec<String>,
    progress: Arc<ProgressState>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            selected_file: None,
            output_dir: None,
            output_file: None,
            log: vec![READY_LOG.to_string()],
            progress: Arc::new(ProgressState::new()),
        }
    }

    /// Selects an input; only existing `.pdf` files are accepted
    pub fn select(&mut self, path: &Path) -> Result<()> {
        if !is_pdf_path(path) {
            return Err(Error::InvalidInput(format!("Not a PDF file: {}", path.display())));
        }
        if !path.is_file() {
            return Err(Error::InvalidInput(format!("Input file does not exist: {}", path.display())));
        }

        self.selected_file = Some(path.to_path_buf());
        self.output_dir = Some(path.parent().unwrap_or_else(|| Path::new("")).to_path_buf());
        self.output_file = None;
        self.log("File selected");
        Ok(())
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Sends output to another directory, keeping the derived file name
    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.output_dir = Some(dir.into());
    }

    /// Writes output to exactly this path
    pub fn set_output_file(&mut self, path: impl Into<PathBuf>) {
        self.output_file = Some(path.into());
    }

    /// `<output dir>/<prefix><input basename>` unless an explicit file was set
    pub fn output_path(&self, prefix: &str) -> Option<PathBuf> {
        if let Some(file) = &self.output_file {
            return Some(file.clone());
        }
        let input = self.selected_file.as_ref()?;
        let derived = output_path_for(input, prefix).ok()?;
        match (&self.output_dir, derived.file_name()) {
            (Some(dir), Some(name)) => Some(dir.join(name)),
            _ => Some(derived),
        }
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    /// The log as shown to the user, one bullet per line after the banner
    pub fn log_text(&self) -> String {
        let mut text = String::new();
        for (index, line) in self.log.iter().enumerate() {
            if index > 0 {
                text.push_str("\n• ");
            }
            text.push_str(line);
        }
        text
    }

    fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.log.push(message);
    }

    /// Runs the pass on the selected file in the background. Every failure
    /// ends up as a single `Error: ...` log line.
    pub async fn process(&mut self, pipeline: Arc<Pipeline>) -> Result<StripReport> {
        let input = match &self.selected_file {
            Some(input) => input.clone(),
            None => {
                self.log("Select a file first!");
                return Err(Error::InvalidInput("no file selected".into()));
            }
        };
        let output = match self.output_path(&pipeline.config().output_prefix) {
            Some(output) => output,
            None => {
                let err = Error::InvalidInput(format!("Cannot derive output path for {}", input.display()));
                self.log_error(&err);
                return Err(err);
            }
        };

        self.log("Processing file...");
        let progress: Arc<dyn ProgressSink> = self.progress.clone();
        match pipeline.execute_in_background(input, output.clone(), progress).await {
            Ok(report) => {
                self.progress.set(100, DONE_STATUS);
                self.log("Processed successfully");
                self.log(format!("New file: {}", output.display()));
                Ok(report)
            }
            Err(err) => {
                self.log_error(&err);
                Err(err)
            }
        }
    }

    fn log_error(&mut self, err: &Error) {
        let message = format!("Error: {}", err);
        error!("❌ {}", message);
        self.log.push(message);
    }

    /// Back to the ready state; the output directory is kept
    pub fn reset(&mut self) {
        self.selected_file = None;
        self.output_file = None;
        self.progress.set(0, READY_STATUS);
        self.log = vec![READY_LOG.to_string()];
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
