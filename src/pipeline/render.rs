//! Rendering: decode the source image, resize it, draw the caption, save.
//!
//! ## Why JPEG output?
//!
//! Memes are photos with a caption; JPEG keeps them small and every browser
//! and chat client displays it. Sources are flattened to RGB first because
//! JPEG carries no alpha channel, so transparent PNGs come out on black.
//!
//! ## Why write to a temp name first?
//!
//! A half-written file under its final `{n}.jpg` name would be served by
//! whoever watches the output directory. The encoder writes `{n}.jpg.tmp` and
//! the file is renamed into place once complete.

use crate::error::MemeError;
use crate::pipeline::layout::{text_origin, wrap_text, Dimensions, GlyphMeasure};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::Path;
use tracing::debug;

/// Extra pixels between consecutive caption lines.
const LINE_SPACING: f32 = 4.0;

/// Caption fill colour.
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: &Path) -> Result<FontVec, MemeError> {
    let bytes = std::fs::read(path).map_err(|e| MemeError::from_io(path, e))?;
    FontVec::try_from_vec(bytes).map_err(|e| MemeError::FontLoad {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Decode an image, sniffing the format from its content.
pub fn open_image(path: &Path) -> Result<DynamicImage, MemeError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| MemeError::from_io(path, e))?;

    reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => MemeError::NotAnImage {
            path: path.to_path_buf(),
        },
        ImageError::IoError(io) => MemeError::from_io(path, io),
        other => MemeError::SourceUnreadable {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    })
}

/// Resize to exactly `dims`, flattening to RGB.
pub fn resize(image: &DynamicImage, dims: Dimensions) -> RgbImage {
    image::imageops::resize(&image.to_rgb8(), dims.width, dims.height, FilterType::CatmullRom)
}

/// Wrap `content` to the image width and draw it left-aligned from
/// [`text_origin`], one line per row. Returns the lines drawn.
pub fn draw_text(image: &mut RgbImage, font: &FontVec, size: f32, content: &str) -> Vec<String> {
    let scale = PxScale::from(size);
    let dims = Dimensions::new(image.width(), image.height());
    let lines = wrap_text(dims.width, &GlyphMeasure::new(font, scale), content);

    let (x, y) = text_origin(dims);
    let pitch = font.as_scaled(scale).height() + LINE_SPACING;
    debug!("Drawing {} caption lines at ({x}, {y}), pitch {pitch:.1}px", lines.len());

    for (i, line) in lines.iter().enumerate() {
        let line_y = y + (i as f32 * pitch).round() as i32;
        draw_text_mut(image, TEXT_COLOR, x, line_y, scale, font, line);
    }
    lines
}

/// Encode `image` as JPEG at `path`, replacing any existing file atomically.
pub fn save_jpeg(image: &RgbImage, path: &Path) -> Result<(), MemeError> {
    let write_failed = |detail: String| MemeError::OutputWriteFailed {
        path: path.to_path_buf(),
        detail,
    };

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    if let Err(e) = image.save_with_format(tmp_path, ImageFormat::Jpeg) {
        let _ = std::fs::remove_file(tmp_path);
        return Err(write_failed(e.to_string()));
    }
    std::fs::rename(tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(tmp_path);
        write_failed(e.to_string())
    })
}

/// First usable TrueType font for rendering tests: `MEME_TEST_FONT`, then
/// a few common system locations.
#[cfg(test)]
pub(crate) fn find_test_font() -> Option<std::path::PathBuf> {
    let candidates = std::env::var_os("MEME_TEST_FONT")
        .map(std::path::PathBuf::from)
        .into_iter()
        .chain(
            [
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/Library/Fonts/Arial.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
            ]
            .into_iter()
            .map(std::path::PathBuf::from),
        );
    candidates.into_iter().find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn open_missing_image_is_not_found() {
        let err = open_image(Path::new("/nonexistent/dog.jpg")).unwrap_err();
        assert!(matches!(err, MemeError::FileNotFound { .. }));
    }

    #[test]
    fn open_non_image_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dog.jpg");
        std::fs::write(&path, "definitely not pixels").unwrap();
        let err = open_image(&path).unwrap_err();
        assert!(
            matches!(err, MemeError::NotAnImage { .. } | MemeError::SourceUnreadable { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn open_sniffs_format_regardless_of_suffix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("download");
        RgbImage::from_pixel(4, 2, Rgb([1, 2, 3]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        let img = open_image(&path).unwrap();
        assert_eq!((img.width(), img.height()), (4, 2));
    }

    #[test]
    fn resize_flattens_alpha_and_scales() {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 50, Rgba([10, 20, 30, 0])));
        let out = resize(&src, Dimensions::new(50, 25));
        assert_eq!(out.dimensions(), (50, 25));
    }

    #[test]
    fn save_jpeg_writes_final_name_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("0.jpg");
        save_jpeg(&RgbImage::from_pixel(8, 8, Rgb([200, 0, 0])), &path).unwrap();
        assert!(path.is_file());
        assert!(!dir.path().join("0.jpg.tmp").exists());
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn save_into_missing_dir_fails() {
        let err = save_jpeg(
            &RgbImage::new(2, 2),
            Path::new("/nonexistent/archive/0.jpg"),
        )
        .unwrap_err();
        assert!(matches!(err, MemeError::OutputWriteFailed { .. }));
    }

    #[test]
    fn garbage_font_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("font.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(load_font(&path), Err(MemeError::FontLoad { .. })));
    }

    #[test]
    fn draw_text_stays_below_origin() {
        let Some(font_path) = find_test_font() else {
            println!("SKIP — no TrueType font found; set MEME_TEST_FONT");
            return;
        };
        let font = load_font(&font_path).unwrap();
        let mut img = RgbImage::new(200, 160);

        let lines = draw_text(&mut img, &font, 16.0, "A short caption that wraps\n- Rex");
        assert!(lines.len() >= 2);
        assert_eq!(lines.last().map(String::as_str), Some("- Rex"));

        let (_, origin_y) = text_origin(Dimensions::new(200, 160));
        let touched: Vec<u32> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [0, 0, 0])
            .map(|(_, y, _)| y)
            .collect();
        assert!(!touched.is_empty(), "caption should be drawn");
        assert!(touched.iter().all(|&y| y >= origin_y as u32));
    }
}
