//! Utility Module Implementation
//! Author: kartik4091
//!
//! Aggregates internal helpers: logging setup, progress reporting and path
//! validation.

pub mod logger;
pub mod progress;
pub mod validation;

// Re-exports for unified access
pub use self::{
    logger::{init_logging, LogLevel},
    progress::{NoProgress, ProgressSink, ProgressUpdate, StripStage, TracingProgress},
    validation::{ensure_writable_output, has_pdf_header, is_pdf_path},
};
