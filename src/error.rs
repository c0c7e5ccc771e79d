//! Error types for the memegen library.
//!
//! A single fatal error type, [`MemeError`], covers every stage of the
//! pipeline. Variants are grouped the way callers need to react to them:
//!
//! * **Input validation**: the request itself is wrong (width too large,
//!   body without author). Raised before any file is touched.
//! * **Unsupported format**: a quote file has no registered parser.
//! * **Source unreadable**: an image, font or document could not be opened
//!   or decoded, or a remote image could not be fetched.
//! * **External tool**: `pdftotext` is missing or failed.
//! * **Schema**: a CSV quote file lacks a required column.
//!
//! Nothing in the library retries; every error propagates to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the memegen library.
#[derive(Debug, Error)]
pub enum MemeError {
    // ── Input validation ──────────────────────────────────────────────────
    /// The caller supplied an invalid request (width, text size, quote parts).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Ingestion ─────────────────────────────────────────────────────────
    /// No quote parser is registered for this file suffix.
    #[error("Cannot ingest '{path}': unsupported file type '{suffix}'\nSupported: .txt, .pdf, .docx, .csv")]
    UnsupportedFormat { path: PathBuf, suffix: String },

    /// A CSV quote file is missing one or more required columns.
    #[error("CSV file '{path}' is missing required column(s): {}", missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },

    /// The external text-extraction tool is unavailable or failed.
    #[error("External tool '{tool}' failed: {detail}")]
    ExternalTool { tool: String, detail: String },

    // ── Source errors ─────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading a source file or directory.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its content could not be decoded.
    #[error("Cannot read '{path}': {detail}")]
    SourceUnreadable { path: PathBuf, detail: String },

    /// Downloaded or local bytes are not in a supported image format.
    #[error("'{path}' is not a supported image (PNG or JPEG expected)")]
    NotAnImage { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The configured TrueType/OpenType font could not be loaded.
    #[error("Failed to load font '{path}': {detail}")]
    FontLoad { path: PathBuf, detail: String },

    // ── Composition ───────────────────────────────────────────────────────
    /// Random selection was requested from a corpus with nothing to pick.
    #[error("No {kind} available in '{dir}'")]
    EmptyCorpus { dir: PathBuf, kind: &'static str },

    /// The persisted sequence counter does not hold a non-negative integer.
    #[error("Index file '{path}' is corrupt: expected a non-negative integer, found {content:?}")]
    IndexCorrupt { path: PathBuf, content: String },

    /// Could not write the rendered meme or the index file.
    #[error("Failed to write output file '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MemeError {
    /// Map an [`std::io::Error`] raised while opening `path` to the most
    /// specific variant.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => MemeError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => MemeError::PermissionDenied { path },
            _ => MemeError::Io { path, source },
        }
    }

    /// True when the error was caused by the caller's request rather than by
    /// the environment (missing files, broken tools, bad corpora).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MemeError::InvalidInput(_) | MemeError::UnsupportedFormat { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_display_names_columns() {
        let e = MemeError::Schema {
            path: "quotes.csv".into(),
            missing: vec!["body".into(), "author".into()],
        };
        let msg = e.to_string();
        assert!(msg.contains("body, author"), "got: {msg}");
        assert!(msg.contains("quotes.csv"));
    }

    #[test]
    fn unsupported_format_display() {
        let e = MemeError::UnsupportedFormat {
            path: "notes.rtf".into(),
            suffix: ".rtf".into(),
        };
        assert!(e.to_string().contains("'.rtf'"));
        assert!(e.is_input_error());
    }

    #[test]
    fn from_io_maps_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            MemeError::from_io("a.txt", err),
            MemeError::FileNotFound { .. }
        ));
    }

    #[test]
    fn from_io_keeps_other_kinds() {
        let err = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8");
        let e = MemeError::from_io("a.txt", err);
        assert!(matches!(e, MemeError::Io { .. }));
        assert!(!e.is_input_error());
    }

    #[test]
    fn empty_corpus_display() {
        let e = MemeError::EmptyCorpus {
            dir: "_data/DogQuotes".into(),
            kind: "quotes",
        };
        assert_eq!(e.to_string(), "No quotes available in '_data/DogQuotes'");
    }
}
