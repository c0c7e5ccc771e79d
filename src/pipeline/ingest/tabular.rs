//! CSV quotes: a header row naming `body` and `author` columns.
//!
//! Rows map onto [`QuoteRecord`] by column name through serde, so column
//! order does not matter and extra columns are ignored. The header is checked
//! up front so a malformed file fails with every missing column named, not
//! with a per-row deserialisation error.

use crate::error::MemeError;
use crate::quote::QuoteRecord;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 2] = ["body", "author"];

pub fn parse(path: &Path) -> Result<Vec<QuoteRecord>, MemeError> {
    let bytes = std::fs::read(path).map_err(|e| MemeError::from_io(path, e))?;
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let unreadable = |e: ::csv::Error| MemeError::SourceUnreadable {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers().map_err(unreadable)?;
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(MemeError::Schema {
            path: path.to_path_buf(),
            missing,
        });
    }

    reader
        .deserialize::<QuoteRecord>()
        .map(|row| row.map_err(unreadable))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn rows_become_quotes_in_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "DogQuotesCSV.csv",
            "body,author\nChase the mailman,Skittle\n\"When in doubt, go shoe-shopping\",Mr. Paws\n",
        );
        let quotes = parse(&path).unwrap();
        assert_eq!(
            quotes,
            vec![
                QuoteRecord::new("Chase the mailman", "Skittle"),
                QuoteRecord::new("When in doubt, go shoe-shopping", "Mr. Paws"),
            ]
        );
    }

    #[test]
    fn columns_match_by_name_not_position() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "q.csv", "\u{feff}author, body ,year\nRex,Woof,2020\n");
        assert_eq!(parse(&path).unwrap(), vec![QuoteRecord::new("Woof", "Rex")]);
    }

    #[test]
    fn missing_body_column_is_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "q.csv", "quote,author\nWoof,Rex\n");
        match parse(&path).unwrap_err() {
            MemeError::Schema { missing, .. } => assert_eq!(missing, vec!["body".to_string()]),
            other => panic!("expected Schema, got {other:?}"),
        }
    }

    #[test]
    fn both_columns_missing_are_both_named() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "q.csv", "a,b\n1,2\n");
        let err = parse(&path).unwrap_err();
        assert!(err.to_string().contains("body, author"), "got: {err}");
    }

    #[test]
    fn header_only_and_empty_files_are_empty() {
        let dir = TempDir::new().unwrap();
        assert!(parse(&write(&dir, "h.csv", "body,author\n")).unwrap().is_empty());
        assert!(parse(&write(&dir, "e.csv", "")).unwrap().is_empty());
    }

    #[test]
    fn ragged_row_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "q.csv", "body,author\nonly-one-field\n");
        assert!(matches!(parse(&path), Err(MemeError::SourceUnreadable { .. })));
    }
}
