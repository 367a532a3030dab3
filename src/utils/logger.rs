//! Logger setup for the link stripping CLI
//! Author: kartik4091
//! Created: 2025-06-05

use std::fmt;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Verbosity accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_str = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        write!(f, "{}", level_str)
    }
}

/// Filter used when `RUST_LOG` is unset; the library and the binary share
/// the `pdf_unlink` target
pub fn default_filter(level: LogLevel) -> String {
    format!("pdf_unlink={}", level)
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`. Returns
/// false when a subscriber was already installed.
pub fn init_logging(level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
