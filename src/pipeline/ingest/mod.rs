//! Quote ingestion: turn heterogeneous documents into [`QuoteRecord`]s.
//!
//! ## Dispatch
//!
//! A fixed registry keyed by file suffix selects the parser:
//!
//! | Suffix  | Format               | Module       |
//! |---------|----------------------|--------------|
//! | `.txt`  | one quote per line   | [`text`]     |
//! | `.pdf`  | `pdftotext -raw`     | [`pdf`]      |
//! | `.docx` | paragraph text       | [`docx`]     |
//! | `.csv`  | `body,author` header | [`tabular`]  |
//!
//! Matching is exact and case-sensitive (`.TXT` is not `.txt`) and never looks
//! at file content. [`QuoteFormat::from_path`] returns `None` for anything
//! else; [`Ingestor::parse`] turns that into
//! [`MemeError::UnsupportedFormat`] without opening the file.

pub mod docx;
pub mod pdf;
pub mod tabular;
pub mod text;

use crate::config::MemeConfig;
use crate::error::MemeError;
use crate::quote::QuoteRecord;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A supported quote file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteFormat {
    Text,
    Pdf,
    Docx,
    Csv,
}

impl QuoteFormat {
    /// Every registered format, in registry order.
    pub const ALL: [QuoteFormat; 4] = [
        QuoteFormat::Text,
        QuoteFormat::Pdf,
        QuoteFormat::Docx,
        QuoteFormat::Csv,
    ];

    /// The suffix (leading dot included) this format is registered under.
    pub fn suffix(self) -> &'static str {
        match self {
            QuoteFormat::Text => ".txt",
            QuoteFormat::Pdf => ".pdf",
            QuoteFormat::Docx => ".docx",
            QuoteFormat::Csv => ".csv",
        }
    }

    /// Look up a suffix such as `".docx"`. Case-sensitive.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.suffix() == suffix)
    }

    /// Resolve the parser for `path` from its final suffix.
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_suffix(&suffix_of(path))
    }
}

impl fmt::Display for QuoteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Final suffix of `path` with its leading dot, or `""` when there is none.
pub(crate) fn suffix_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Parses quote files, dispatching on suffix.
///
/// Holds the little configuration the parsers need (currently the
/// `pdftotext` executable).
#[derive(Debug, Clone)]
pub struct Ingestor {
    pdftotext: PathBuf,
}

impl Default for Ingestor {
    fn default() -> Self {
        Self {
            pdftotext: PathBuf::from("pdftotext"),
        }
    }
}

impl Ingestor {
    pub fn new(pdftotext: impl Into<PathBuf>) -> Self {
        Self {
            pdftotext: pdftotext.into(),
        }
    }

    pub fn from_config(config: &MemeConfig) -> Self {
        Self::new(&config.pdftotext)
    }

    /// Parse one quote file, choosing the parser from its suffix.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Vec<QuoteRecord>, MemeError> {
        let path = path.as_ref();
        let format = QuoteFormat::from_path(path).ok_or_else(|| MemeError::UnsupportedFormat {
            path: path.to_path_buf(),
            suffix: suffix_of(path),
        })?;
        self.parse_as(format, path)
    }

    /// Parse `path` with an explicitly chosen parser, ignoring its suffix.
    pub fn parse_as(&self, format: QuoteFormat, path: &Path) -> Result<Vec<QuoteRecord>, MemeError> {
        let quotes = match format {
            QuoteFormat::Text => text::parse(path)?,
            QuoteFormat::Pdf => pdf::parse(path, &self.pdftotext)?,
            QuoteFormat::Docx => docx::parse(path)?,
            QuoteFormat::Csv => tabular::parse(path)?,
        };
        debug!("Parsed {} quotes from {}", quotes.len(), path.display());
        Ok(quotes)
    }

    /// Parse every supported file directly inside `dir` into one pool.
    ///
    /// Entries are visited in file-name order so that seeded random selection
    /// over the pool is reproducible. Sub-directories and unsupported suffixes
    /// are skipped; a supported file that fails to parse aborts the scan.
    pub fn parse_corpus(&self, dir: impl AsRef<Path>) -> Result<Vec<QuoteRecord>, MemeError> {
        let dir = dir.as_ref();
        let mut pool = Vec::new();

        for path in list_files(dir)? {
            match QuoteFormat::from_path(&path) {
                Some(format) => pool.extend(self.parse_as(format, &path)?),
                None => debug!("Skipping unsupported quote file {}", path.display()),
            }
        }

        info!("Loaded {} quotes from {}", pool.len(), dir.display());
        Ok(pool)
    }
}

/// Parse a single quote file with default settings.
pub fn parse(path: impl AsRef<Path>) -> Result<Vec<QuoteRecord>, MemeError> {
    Ingestor::default().parse(path)
}

/// Direct file entries of `dir`, sorted by path.
pub(crate) fn list_files(dir: &Path) -> Result<Vec<PathBuf>, MemeError> {
    let entries = std::fs::read_dir(dir).map_err(|e| MemeError::from_io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MemeError::from_io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolves_registered_suffixes() {
        assert_eq!(QuoteFormat::from_path(Path::new("a.txt")), Some(QuoteFormat::Text));
        assert_eq!(QuoteFormat::from_path(Path::new("a.pdf")), Some(QuoteFormat::Pdf));
        assert_eq!(QuoteFormat::from_path(Path::new("dir/a.docx")), Some(QuoteFormat::Docx));
        assert_eq!(QuoteFormat::from_path(Path::new("a.csv")), Some(QuoteFormat::Csv));
    }

    #[test]
    fn unknown_or_miscased_suffix_has_no_parser() {
        assert_eq!(QuoteFormat::from_path(Path::new("a.rtf")), None);
        assert_eq!(QuoteFormat::from_path(Path::new("a.TXT")), None);
        assert_eq!(QuoteFormat::from_path(Path::new("README")), None);
        assert_eq!(QuoteFormat::from_suffix("docx"), None);
    }

    #[test]
    fn parse_rejects_rtf_without_reading() {
        // The file does not exist: an I/O error would mean a parser ran.
        let err = parse("/nonexistent/quotes.rtf").unwrap_err();
        match err {
            MemeError::UnsupportedFormat { suffix, .. } => assert_eq!(suffix, ".rtf"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn parse_missing_text_file_is_not_found() {
        let err = parse("/nonexistent/quotes.txt").unwrap_err();
        assert!(matches!(err, MemeError::FileNotFound { .. }), "got {err:?}");
    }

    #[test]
    fn corpus_scan_skips_unsupported_and_subdirs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "One - Rex\nTwo - Fido\n").unwrap();
        fs::write(dir.path().join("b.csv"), "body,author\nThree,Spot\n").unwrap();
        fs::write(dir.path().join("c.rtf"), "Ignored - Nobody\n").unwrap();
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let pool = Ingestor::default().parse_corpus(dir.path()).unwrap();
        assert_eq!(
            pool,
            vec![
                QuoteRecord::new("One", "Rex"),
                QuoteRecord::new("Two", "Fido"),
                QuoteRecord::new("Three", "Spot"),
            ]
        );
    }

    #[test]
    fn corpus_scan_propagates_parse_failures() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.csv"), "quote,who\nx,y\n").unwrap();
        let err = Ingestor::default().parse_corpus(dir.path()).unwrap_err();
        assert!(matches!(err, MemeError::Schema { .. }));
    }

    #[test]
    fn corpus_scan_of_missing_dir_fails() {
        let err = Ingestor::default()
            .parse_corpus("/nonexistent/corpus")
            .unwrap_err();
        assert!(matches!(err, MemeError::FileNotFound { .. }));
    }
}
