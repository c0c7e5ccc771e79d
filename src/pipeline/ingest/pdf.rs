//! PDF quotes via poppler's `pdftotext`.
//!
//! ## Why an external tool?
//!
//! Quote files are small and plain; `pdftotext -raw` keeps content-stream
//! order, which is exactly the one-quote-per-line layout the text parser
//! expects. The tool writes into an intermediate file owned by a
//! [`tempfile::NamedTempFile`], so the file is removed when the handle drops:
//! on success, on a failed conversion, and on a parse error alike.
//!
//! The call blocks until `pdftotext` exits; there is no timeout.

use crate::error::MemeError;
use crate::quote::{quotes_from_lines, QuoteRecord};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Extract the text of `path` with `pdftotext` and parse delimiter lines.
pub fn parse(path: &Path, pdftotext: &Path) -> Result<Vec<QuoteRecord>, MemeError> {
    // Surface a missing input as an I/O error rather than a tool failure.
    std::fs::metadata(path).map_err(|e| MemeError::from_io(path, e))?;

    let intermediate = tempfile::Builder::new()
        .prefix("memegen-pdf-")
        .suffix(".txt")
        .tempfile()
        .map_err(|e| MemeError::Internal(format!("tempfile: {e}")))?;

    let tool = pdftotext.display().to_string();
    debug!("Running {} -raw {} {}", tool, path.display(), intermediate.path().display());

    let output = Command::new(pdftotext)
        .arg("-raw")
        .arg(path)
        .arg(intermediate.path())
        .output()
        .map_err(|e| MemeError::ExternalTool {
            tool: tool.clone(),
            detail: if e.kind() == std::io::ErrorKind::NotFound {
                "not found; install poppler-utils or set the pdftotext path".to_string()
            } else {
                e.to_string()
            },
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MemeError::ExternalTool {
            tool,
            detail: format!("{} ({})", stderr.trim(), output.status),
        });
    }

    let text = std::fs::read_to_string(intermediate.path())
        .map_err(|e| MemeError::from_io(intermediate.path(), e))?;
    Ok(quotes_from_lines(&text))
}
