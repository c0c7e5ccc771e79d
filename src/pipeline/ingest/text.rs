//! Plain-text quotes: one `"<body> - <author>"` per line.

use crate::error::MemeError;
use crate::quote::{quotes_from_lines, QuoteRecord};
use std::path::Path;

/// Read `path` as UTF-8 and keep every line containing the delimiter.
pub fn parse(path: &Path) -> Result<Vec<QuoteRecord>, MemeError> {
    let content = std::fs::read_to_string(path).map_err(|e| MemeError::from_io(path, e))?;
    Ok(quotes_from_lines(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_delimited_lines_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("DogQuotesTXT.txt");
        fs::write(
            &path,
            "To bork or not to bork - Bork\nHe who smelt it... - Stinky\n\nA heading line\n",
        )
        .unwrap();

        let quotes = parse(&path).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0], QuoteRecord::new("To bork or not to bork", "Bork"));
        assert_eq!(quotes[1].author(), "Stinky");
    }

    #[test]
    fn empty_file_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();
        assert!(parse(&path).unwrap().is_empty());
    }

    #[test]
    fn non_utf8_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [0xff, 0xfe, 0x41]).unwrap();
        assert!(matches!(parse(&path), Err(MemeError::Io { .. })));
    }
}
