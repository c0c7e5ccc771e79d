//! DOCX quotes: visible paragraph text of `word/document.xml`.
//!
//! A `.docx` file is a ZIP container; the body lives in `word/document.xml`
//! as a flat sequence of `<w:p>` paragraphs made of `<w:r>` runs. Only the
//! pieces that render as text matter here, so a handful of anchored regexes
//! is enough: no styles, numbering or relationships are read.

use crate::error::MemeError;
use crate::quote::{quotes_from_lines, QuoteRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// Parse `path` and keep every paragraph line containing the delimiter.
pub fn parse(path: &Path) -> Result<Vec<QuoteRecord>, MemeError> {
    let xml = read_document_xml(path)?;
    let text = paragraphs(&xml).join("\n");
    Ok(quotes_from_lines(&text))
}

fn read_document_xml(path: &Path) -> Result<String, MemeError> {
    let file = File::open(path).map_err(|e| MemeError::from_io(path, e))?;

    let unreadable = |detail: String| MemeError::SourceUnreadable {
        path: path.to_path_buf(),
        detail,
    };

    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| unreadable(format!("not a DOCX container: {e}")))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| unreadable(format!("missing {DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| unreadable(format!("{DOCUMENT_PART} is not UTF-8: {e}")))?;
    Ok(xml)
}

// ── Paragraph extraction ─────────────────────────────────────────────────────

/// `<w:p …>…</w:p>` or a self-closing empty `<w:p/>`. `<w:pPr>` never matches.
static RE_PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:p(?:\s[^>]*)?(?:/>|>(.*?)</w:p>)").unwrap());

/// Text-bearing elements inside a paragraph, in document order.
static RE_TEXT_PIECE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:t(?:\s[^>]*)?/>|<w:(tab|br|cr)(?:\s[^>]*)?/>")
        .unwrap()
});

static RE_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").unwrap());

/// Visible text of every paragraph, in order. Tabs become `\t`, explicit
/// breaks become `\n`.
fn paragraphs(xml: &str) -> Vec<String> {
    RE_PARAGRAPH
        .captures_iter(xml)
        .map(|p| p.get(1).map_or_else(String::new, |inner| paragraph_text(inner.as_str())))
        .collect()
}

fn paragraph_text(inner: &str) -> String {
    let mut text = String::new();
    for piece in RE_TEXT_PIECE.captures_iter(inner) {
        if let Some(run) = piece.get(1) {
            text.push_str(&decode_entities(run.as_str()));
        } else if let Some(tag) = piece.get(2) {
            text.push(if tag.as_str() == "tab" { '\t' } else { '\n' });
        }
    }
    text
}

fn decode_entities(s: &str) -> String {
    RE_ENTITY
        .replace_all(s, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if name.starts_with("#x") => u32::from_str_radix(&name[2..], 16)
                    .ok()
                    .and_then(char::from_u32),
                _ => name[1..].parse::<u32>().ok().and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
