//! Main Library File for PDF Link Removal
//! Strips hyperlink annotations, link actions and link-looking content
//! stream text from PDF documents.

// Configuration and Core Pipeline
pub mod config;
pub mod error;
pub mod pdf_document;
pub mod pipeline;
pub mod session;

// Cleaning passes
pub mod cleaner;

// Output checks and reporting
pub mod report;
pub mod verifier;

// Shared Utilities
pub mod utils;

// Re-exports for crate consumers
pub use cleaner::{ActionCleaner, ContentScrubber};
pub use config::{CatalogMode, LinkPattern, StripConfig};
pub use error::{CleanerError, Error, Result};
pub use pdf_document::{output_path_for, PdfDocument};
pub use pipeline::Pipeline;
pub use report::{ReportConfig, ReportFormat, ReportFormatter, ReportGenerator, RunSummary, StripReport};
pub use session::Session;
pub use verifier::{OutputVerifier, VerificationReport};
