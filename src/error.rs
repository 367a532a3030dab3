//! Error types and handling for the link stripper
//! Author: kartik4091

use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Custom result type for link stripping operations
pub type Result<T> = StdResult<T, Error>;

/// Core error type for link stripping operations
#[derive(Error, Debug)]
#[non_exhaustive]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("PDF error: {0}")]
    PdfError(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("Cleaner error: {0}")]
    CleanerError(#[from] CleanerError),

    #[error("Concurrency error: {0}")]
    ConcurrencyError(String),

    #[error("Report error: {0}")]
    ReportError(String),

    #[error("Verification error: {0}")]
    VerificationError(String),
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::ConcurrencyError(format!("background worker failed: {}", err))
    }
}

// -------------------- Sub-Error Categories --------------------

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CleanerError {
    #[error("Content cleaning failed: {0}")]
    ContentError(String),

    #[error("Structure cleaning failed: {0}")]
    StructureError(String),

    #[error("Invalid link pattern: {0}")]
    PatternError(String),
}
