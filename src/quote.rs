//! The quote value type shared by every ingestion format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between body and author in line-oriented quote formats.
pub const DELIMITER: &str = " - ";

/// A single quote: body text plus its author.
///
/// Construction is permissive: empty strings are accepted so records parsed
/// from a corpus (which may carry incidental blanks) and records built from
/// caller input behave the same way. Request-level validation lives in
/// [`crate::engine::MemeRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteRecord {
    body: String,
    author: String,
}

impl QuoteRecord {
    pub fn new(body: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            author: author.into(),
        }
    }

    /// Split a `"<body> - <author>"` line at the first delimiter.
    ///
    /// Returns `None` when the line has no delimiter. Anything after the first
    /// delimiter, further delimiters included, belongs to the author.
    pub fn from_line(line: &str) -> Option<Self> {
        let (body, author) = line.split_once(DELIMITER)?;
        Some(Self::new(body.trim(), author.trim()))
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Text drawn onto the meme: body, line break, dash-prefixed author.
    pub fn caption(&self) -> String {
        format!("{}\n- {}", self.body, self.author)
    }
}

impl fmt::Display for QuoteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.body, DELIMITER, self.author)
    }
}

/// Collect every delimiter-bearing line of `text` into quotes.
///
/// Shared by the plain-text, PDF and DOCX parsers. A leading byte-order mark
/// is ignored and both `\n` and `\r\n` line endings are accepted.
pub(crate) fn quotes_from_lines(text: &str) -> Vec<QuoteRecord> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .filter_map(QuoteRecord::from_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_line() {
        let q = QuoteRecord::from_line("A - B").unwrap();
        assert_eq!(q.body(), "A");
        assert_eq!(q.author(), "B");
    }

    #[test]
    fn remainder_stays_with_author() {
        let q = QuoteRecord::from_line("A - B - C").unwrap();
        assert_eq!(q.body(), "A");
        assert_eq!(q.author(), "B - C");
    }

    #[test]
    fn line_without_delimiter_is_skipped() {
        assert!(QuoteRecord::from_line("no delimiter-here").is_none());
        assert!(QuoteRecord::from_line("").is_none());
    }

    #[test]
    fn caption_and_display() {
        let q = QuoteRecord::new("Bark", "Rex");
        assert_eq!(q.caption(), "Bark\n- Rex");
        assert_eq!(q.to_string(), "Bark - Rex");
    }

    #[test]
    fn lines_with_bom_and_crlf() {
        let quotes = quotes_from_lines("\u{feff}To bark - Skittle\r\nheader\r\nFetch - Mr. Paws\r\n");
        assert_eq!(
            quotes,
            vec![
                QuoteRecord::new("To bark", "Skittle"),
                QuoteRecord::new("Fetch", "Mr. Paws"),
            ]
        );
    }

    #[test]
    fn permissive_construction() {
        let q = QuoteRecord::new("", "");
        assert_eq!(q.caption(), "\n- ");
    }
}
