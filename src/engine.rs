//! Meme composition: validate a request, pick its inputs, render, archive.
//!
//! [`MemeEngine::make_meme`] is the single entry point the CLI (and any
//! other front end) drives. Steps, in order:
//!
//! 1. Validate `width`, `text_size` and the body/author pairing. Nothing is
//!    read or written before validation passes.
//! 2. Choose the image: explicit path, or a random `.jpg`/`.png` from the
//!    image corpus.
//! 3. Choose the quote: explicit body + author, or a random record from the
//!    parsed quote corpus.
//! 4. Decode, resize, draw `"{body}\n- {author}"`.
//! 5. Allocate the next sequence index and write `{output_dir}/{n}.jpg`.
//!
//! The index is allocated only after rendering succeeded, so a request that
//! fails (missing font, corrupt image) never burns a number.

use crate::config::{MemeConfig, DEFAULT_TEXT_SIZE, DEFAULT_WIDTH};
use crate::error::MemeError;
use crate::index::{FileIndexAllocator, IndexAllocator};
use crate::pipeline::ingest::Ingestor;
use crate::pipeline::input::{pick_random_image, resolve_image};
use crate::pipeline::layout::{compute_resize, validate_width, Dimensions};
use crate::pipeline::render;
use crate::quote::QuoteRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, info, warn};

/// One meme to make. Every field is optional; unset fields fall back to the
/// fixed defaults (width 500, text size 30) or to random selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemeRequest {
    /// Output width in pixels, 1–500. Default: 500.
    pub width: Option<u32>,
    /// Font size in pixels. Default: 30.
    pub text_size: Option<u32>,
    /// Source image. Random from the image corpus when unset.
    pub image: Option<PathBuf>,
    /// Quote body. Requires a non-empty `author`, even when empty itself.
    pub body: Option<String>,
    /// Quote author. Ignored without `body`.
    pub author: Option<String>,
}

impl MemeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, px: u32) -> Self {
        self.width = Some(px);
        self
    }

    pub fn text_size(mut self, size: u32) -> Self {
        self.text_size = Some(size);
        self
    }

    pub fn image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Shorthand for `.body(body).author(author)`.
    pub fn quote(self, body: impl Into<String>, author: impl Into<String>) -> Self {
        self.body(body).author(author)
    }
}

/// A meme written to the archive, plus what went into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemeArtifact {
    /// `{output_dir}/{index}.jpg`
    pub path: PathBuf,
    pub index: u64,
    /// Image source as given: a corpus or explicit path, or the URL.
    pub image: PathBuf,
    pub quote: QuoteRecord,
    /// Caption text before wrapping.
    pub content: String,
    /// Caption lines as drawn.
    pub lines: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub text_size: u32,
}

/// Request parameters after validation.
#[derive(Debug)]
struct Plan {
    width: u32,
    text_size: u32,
    quote: Option<QuoteRecord>,
}

/// Composes memes from a [`MemeConfig`].
///
/// Shareable between threads: the RNG sits behind a mutex and the
/// [`IndexAllocator`] is `Send + Sync`.
pub struct MemeEngine {
    config: MemeConfig,
    ingestor: Ingestor,
    allocator: Arc<dyn IndexAllocator>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl std::fmt::Debug for MemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemeEngine")
            .field("config", &self.config)
            .field("ingestor", &self.ingestor)
            .finish_non_exhaustive()
    }
}

impl MemeEngine {
    /// Create an engine, creating `config.output_dir` if it does not exist.
    ///
    /// Indices come from a [`FileIndexAllocator`] on `config.index_path`;
    /// randomness from `StdRng`, seeded with `config.seed` when set.
    pub fn new(config: MemeConfig) -> Result<Self, MemeError> {
        create_output_dir(&config.output_dir)?;

        let rng: Box<dyn RngCore + Send> = match config.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        };

        Ok(Self {
            ingestor: Ingestor::from_config(&config),
            allocator: Arc::new(FileIndexAllocator::new(&config.index_path)),
            rng: Mutex::new(rng),
            config,
        })
    }

    /// Replace the index allocator.
    pub fn with_index_allocator(mut self, allocator: Arc<dyn IndexAllocator>) -> Self {
        self.allocator = allocator;
        self
    }

    /// Replace the random source used for image and quote selection.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn config(&self) -> &MemeConfig {
        &self.config
    }

    /// Make one meme and write it to the archive.
    pub fn make_meme(&self, request: MemeRequest) -> Result<MemeArtifact, MemeError> {
        let plan = self.validate(&request)?;

        let image = match request.image {
            Some(path) => path,
            None => pick_random_image(&self.config.image_dir, &mut **self.rng()?)?,
        };
        self.compose(&image, image.clone(), plan)
    }

    /// Like [`make_meme`](Self::make_meme), with the image given as a local
    /// path or an HTTP(S) URL. `request.image` is ignored.
    ///
    /// A downloaded image is deleted before this returns, whether or not
    /// rendering succeeded.
    pub async fn make_meme_from_input(
        &self,
        input: &str,
        request: MemeRequest,
    ) -> Result<MemeArtifact, MemeError> {
        let plan = self.validate(&request)?;
        let resolved = resolve_image(input, self.config.download_timeout_secs).await?;

        // Decoding, `pdftotext` and encoding block; keep them off the async
        // workers where the runtime allows it.
        let render = || self.compose(resolved.path(), PathBuf::from(input), plan);
        match Handle::try_current().map(|h| h.runtime_flavor()) {
            Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(render),
            _ => render(),
        }
    }

    /// Path of the most recently archived meme, or `None` before the first.
    ///
    /// Derived from the allocator's counter; the file itself is not checked.
    pub fn latest_meme(&self) -> Result<Option<PathBuf>, MemeError> {
        let next = self.allocator.peek()?;
        Ok(next
            .checked_sub(1)
            .map(|last| self.config.output_dir.join(format!("{last}.jpg"))))
    }

    fn validate(&self, request: &MemeRequest) -> Result<Plan, MemeError> {
        let text_size = request.text_size.unwrap_or(DEFAULT_TEXT_SIZE);
        if text_size == 0 {
            return Err(MemeError::InvalidInput("text size must be at least 1".into()));
        }

        let width = request.width.unwrap_or(DEFAULT_WIDTH);
        validate_width(width)?;

        let quote = match (request.body.as_deref(), request.author.as_deref()) {
            (Some(body), Some(author)) if !author.is_empty() => Some(QuoteRecord::new(body, author)),
            (Some(_), _) => {
                return Err(MemeError::InvalidInput(
                    "author required if body supplied".into(),
                ))
            }
            (None, Some(author)) => {
                warn!("Ignoring author {:?} given without a body", author);
                None
            }
            (None, None) => None,
        };

        Ok(Plan {
            width,
            text_size,
            quote,
        })
    }

    fn compose(&self, image_path: &Path, source: PathBuf, plan: Plan) -> Result<MemeArtifact, MemeError> {
        let quote = match plan.quote {
            Some(quote) => quote,
            None => self.random_quote()?,
        };
        let content = quote.caption();

        let decoded = render::open_image(image_path)?;
        let dims = compute_resize(Dimensions::new(decoded.width(), decoded.height()), Some(plan.width))?;
        debug!(
            "Resizing {} from {}x{} to {}x{}",
            image_path.display(),
            decoded.width(),
            decoded.height(),
            dims.width,
            dims.height
        );
        let mut canvas = render::resize(&decoded, dims);

        let font = render::load_font(&self.config.font_path)?;
        let lines = render::draw_text(&mut canvas, &font, plan.text_size as f32, &content);

        let index = self.allocator.allocate()?;
        create_output_dir(&self.config.output_dir)?;
        let path = self.config.output_dir.join(format!("{index}.jpg"));
        render::save_jpeg(&canvas, &path)?;

        info!("Wrote meme {} ({} caption lines)", path.display(), lines.len());

        Ok(MemeArtifact {
            path,
            index,
            image: source,
            quote,
            content,
            lines,
            width: dims.width,
            height: dims.height,
            text_size: plan.text_size,
        })
    }

    fn random_quote(&self) -> Result<QuoteRecord, MemeError> {
        let dir = &self.config.quote_dir;
        let pool = self.ingestor.parse_corpus(dir)?;
        pool.choose(&mut **self.rng()?)
            .cloned()
            .ok_or_else(|| MemeError::EmptyCorpus {
                dir: dir.clone(),
                kind: "quotes",
            })
    }

    fn rng(&self) -> Result<MutexGuard<'_, Box<dyn RngCore + Send>>, MemeError> {
        self.rng
            .lock()
            .map_err(|_| MemeError::Internal("rng lock poisoned".into()))
    }
}

fn create_output_dir(dir: &Path) -> Result<(), MemeError> {
    std::fs::create_dir_all(dir).map_err(|e| MemeError::OutputWriteFailed {
        path: dir.to_path_buf(),
        detail: e.to_string(),
    })
}
