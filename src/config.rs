//! Configuration types for meme composition.
//!
//! All engine behaviour is controlled through [`MemeConfig`], built via its
//! [`MemeConfigBuilder`]. The defaults reproduce the directory layout the
//! bundled corpora ship with, so `MemeConfig::default()` works from a checkout
//! root without any flags.

use crate::error::MemeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest output width the engine will render, in pixels.
pub const MAX_WIDTH: u32 = 500;

/// Output width used when the request does not name one. Not configurable.
pub const DEFAULT_WIDTH: u32 = 500;

/// Font size used when the request does not name one. Not configurable.
pub const DEFAULT_TEXT_SIZE: u32 = 30;

/// Configuration for a [`crate::MemeEngine`].
///
/// # Example
/// ```rust
/// use memegen::MemeConfig;
///
/// let config = MemeConfig::builder()
///     .image_dir("corpus/images")
///     .quote_dir("corpus/quotes")
///     .output_dir("out")
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemeConfig {
    /// Directory of `.jpg` / `.png` files eligible for random selection.
    pub image_dir: PathBuf,

    /// Directory of quote files (`.txt`, `.pdf`, `.docx`, `.csv`).
    ///
    /// Only direct entries are scanned; files with other suffixes are skipped.
    pub quote_dir: PathBuf,

    /// TrueType/OpenType font used to draw the quote.
    pub font_path: PathBuf,

    /// Directory generated memes are written to. Created if absent.
    pub output_dir: PathBuf,

    /// Counter file backing the default [`crate::index::FileIndexAllocator`].
    pub index_path: PathBuf,

    /// `pdftotext` executable (name on `PATH` or explicit path).
    pub pdftotext: PathBuf,

    /// Download timeout for URL image sources in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Seed for random image/quote selection. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for MemeConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("_data/photos/dog"),
            quote_dir: PathBuf::from("_data/DogQuotes"),
            font_path: PathBuf::from("_data/Fonts/BerkshireSwash-Regular.ttf"),
            output_dir: PathBuf::from("default_meme_archive"),
            index_path: PathBuf::from("_data/meme_index"),
            pdftotext: PathBuf::from("pdftotext"),
            download_timeout_secs: 120,
            seed: None,
        }
    }
}

impl MemeConfig {
    /// Create a new builder for `MemeConfig`.
    pub fn builder() -> MemeConfigBuilder {
        MemeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`MemeConfig`].
#[derive(Debug)]
pub struct MemeConfigBuilder {
    config: MemeConfig,
}

impl MemeConfigBuilder {
    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.image_dir = dir.into();
        self
    }

    pub fn quote_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.quote_dir = dir.into();
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = path.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.index_path = path.into();
        self
    }

    pub fn pdftotext(mut self, bin: impl Into<PathBuf>) -> Self {
        self.config.pdftotext = bin.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<MemeConfig, MemeError> {
        let c = &self.config;
        if c.download_timeout_secs == 0 {
            return Err(MemeError::InvalidConfig(
                "download_timeout_secs must be ≥ 1".into(),
            ));
        }
        if c.pdftotext.as_os_str().is_empty() {
            return Err(MemeError::InvalidConfig("pdftotext must not be empty".into()));
        }
        Ok(self.config)
    }
}
