//! Layout: output dimensions and word-wrapped caption lines.
//!
//! ## Why average character width?
//!
//! Wrapping works in characters, not pixels: the caption's total rendered
//! length divided by its visible character count gives an average glyph
//! width, and the usable line length is 90 % of the image width divided by
//! that average. Narrow and wide glyphs are not told apart, so a line can
//! slightly overshoot or undershoot the real pixel width. That imprecision is
//! accepted; measurement sits behind [`TextMeasure`] so an exact-metrics
//! implementation can replace [`GlyphMeasure`] without touching
//! [`wrap_text`].

use crate::config::MAX_WIDTH;
use crate::error::MemeError;
use ab_glyph::{Font, PxScale, ScaleFont};

/// Fraction of the image width text may occupy.
const DRAWABLE_FRACTION: f64 = 0.9;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Scale `source` proportionally to `target_width` (default [`MAX_WIDTH`]).
///
/// Widths above [`MAX_WIDTH`] or equal to zero are rejected as invalid input.
/// The new height is `round(height * target / width)`, at least 1.
pub fn compute_resize(source: Dimensions, target_width: Option<u32>) -> Result<Dimensions, MemeError> {
    let width = target_width.unwrap_or(MAX_WIDTH);
    validate_width(width)?;
    if source.width == 0 || source.height == 0 {
        return Err(MemeError::InvalidInput(format!(
            "source image has no pixels ({}x{})",
            source.width, source.height
        )));
    }

    let height = (f64::from(source.height) * f64::from(width) / f64::from(source.width)).round();
    Ok(Dimensions::new(width, (height as u32).max(1)))
}

/// Reject widths above [`MAX_WIDTH`] or equal to zero.
pub fn validate_width(width: u32) -> Result<(), MemeError> {
    if width > MAX_WIDTH {
        return Err(MemeError::InvalidInput(format!(
            "width must not be greater than {MAX_WIDTH}, got {width}"
        )));
    }
    if width == 0 {
        return Err(MemeError::InvalidInput("width must be at least 1".into()));
    }
    Ok(())
}

// ── Measurement ──────────────────────────────────────────────────────────────

/// Rendered pixel length of a single line of text.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> f32;
}

/// [`TextMeasure`] backed by glyph advances and kerning of a loaded font.
pub struct GlyphMeasure<'a, F> {
    font: &'a F,
    scale: PxScale,
}

impl<'a, F: Font> GlyphMeasure<'a, F> {
    pub fn new(font: &'a F, scale: impl Into<PxScale>) -> Self {
        Self {
            font,
            scale: scale.into(),
        }
    }
}

impl<F: Font> TextMeasure for GlyphMeasure<'_, F> {
    fn measure(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0;
        let mut prev = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }
}

// ── Wrapping ─────────────────────────────────────────────────────────────────

/// Maximum characters per line for `text` on an image `image_width` wide.
///
/// Returns `None` when the text has no visible characters.
pub fn max_line_chars(image_width: u32, measure: &impl TextMeasure, text: &str) -> Option<usize> {
    let visible: String = text.chars().filter(|&c| c != '\n').collect();
    let count = visible.chars().count();
    if count == 0 {
        return None;
    }

    let avg_char_width = f64::from(measure.measure(&visible)) / count as f64;
    if avg_char_width <= 0.0 {
        return Some(usize::MAX);
    }
    let max = (f64::from(image_width) * DRAWABLE_FRACTION / avg_char_width).floor() as usize;
    Some(max.max(1))
}

/// Wrap `text` to fit an image `image_width` pixels wide.
///
/// Embedded `\n` are kept as forced breaks; within a paragraph words are
/// packed greedily, separated by single spaces, and a word longer than a
/// whole line is split.
pub fn wrap_text(image_width: u32, measure: &impl TextMeasure, text: &str) -> Vec<String> {
    match max_line_chars(image_width, measure, text) {
        Some(max) => text.split('\n').flat_map(|p| wrap_paragraph(p, max)).collect(),
        None => text.split('\n').map(str::to_string).collect(),
    }
}

fn wrap_paragraph(paragraph: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in paragraph.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        let needed = if line_len == 0 { word.len() } else { line_len + 1 + word.len() };
        if needed <= max {
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(word.iter());
            line_len += word.len();
            continue;
        }

        if line_len > 0 {
            lines.push(std::mem::take(&mut line));
        }
        while word.len() > max {
            let rest = word.split_off(max);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        line.extend(word.iter());
        line_len = word.len();
    }

    if line_len > 0 || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Top-left corner of the caption block: left edge, 5/8 down the image.
pub fn text_origin(dims: Dimensions) -> (i32, i32) {
    (0, (u64::from(dims.height) * 5 / 8) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is `w` pixels wide.
    struct Fixed(f32);

    impl TextMeasure for Fixed {
        fn measure(&self, text: &str) -> f32 {
            text.chars().count() as f32 * self.0
        }
    }

    #[test]
    fn resize_halves_landscape() {
        let dims = compute_resize(Dimensions::new(1000, 500), Some(500)).unwrap();
        assert_eq!(dims, Dimensions::new(500, 250));
    }

    #[test]
    fn resize_defaults_to_500_and_rounds() {
        let dims = compute_resize(Dimensions::new(300, 199), None).unwrap();
        // 199 * 500 / 300 = 331.67
        assert_eq!(dims, Dimensions::new(500, 332));
    }

    #[test]
    fn resize_never_collapses_height() {
        let dims = compute_resize(Dimensions::new(5000, 1), Some(100)).unwrap();
        assert_eq!(dims.height, 1);
    }

    #[test]
    fn resize_rejects_too_wide() {
        let err = compute_resize(Dimensions::new(1000, 500), Some(501)).unwrap_err();
        assert!(matches!(err, MemeError::InvalidInput(_)));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn resize_rejects_zero_width() {
        assert!(compute_resize(Dimensions::new(10, 10), Some(0)).is_err());
    }

    #[test]
    fn max_chars_from_average_width() {
        // 500 * 0.9 / 10 = 45
        assert_eq!(max_line_chars(500, &Fixed(10.0), "abc\ndef"), Some(45));
        assert_eq!(max_line_chars(500, &Fixed(10.0), "\n"), None);
        assert_eq!(max_line_chars(10, &Fixed(50.0), "wide"), Some(1));
    }

    #[test]
    fn wraps_on_whitespace_within_limit() {
        // 100 * 0.9 / 10 = 9 chars per line
        let lines = wrap_text(100, &Fixed(10.0), "the quick brown fox jumps");
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 9));
    }

    #[test]
    fn embedded_newline_forces_break() {
        let lines = wrap_text(500, &Fixed(10.0), "Hello there\n- Rex");
        assert_eq!(lines, vec!["Hello there", "- Rex"]);
    }

    #[test]
    fn long_word_is_split() {
        let lines = wrap_text(50, &Fixed(10.0), "ab abcdefghij");
        // 4 chars per line
        assert_eq!(lines, vec!["ab", "abcd", "efgh", "ij"]);
    }

    #[test]
    fn overflowing_word_starts_a_fresh_line() {
        // 4 chars per line; each overflow flushes the previous line.
        let lines = wrap_text(50, &Fixed(10.0), "abc de fgh");
        assert_eq!(lines, vec!["abc", "de", "fgh"]);
    }

    #[test]
    fn empty_paragraphs_survive() {
        let lines = wrap_text(500, &Fixed(10.0), "a\n\nb");
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn origin_is_five_eighths_down() {
        assert_eq!(text_origin(Dimensions::new(500, 250)), (0, 156));
        assert_eq!(text_origin(Dimensions::new(500, 8)), (0, 5));
    }
}
