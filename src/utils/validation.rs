//! Input and output path checks

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// PDF file signature
pub const PDF_HEADER: &[u8] = b"%PDF-";

/// True for paths ending in `.pdf`, any case
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

pub fn has_pdf_header(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_HEADER)
}

/// Refuses to write over the input, or over an existing file unless
/// `overwrite` is set.
pub fn ensure_writable_output(input: &Path, output: &Path, overwrite: bool) -> Result<()> {
    if same_file(input, output) {
        return Err(Error::InvalidInput(format!(
            "Output would replace the input file: {}",
            output.display()
        )));
    }
    if output.exists() && !overwrite {
        return Err(Error::OutputExists(output.to_path_buf()));
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
