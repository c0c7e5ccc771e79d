//! # memegen
//!
//! Caption photos with quotes and archive the results as numbered JPEGs.
//!
//! ## Pipeline Overview
//!
//! ```text
//! request
//!  │
//!  ├─ 1. Validate  width ≤ 500, text size ≥ 1, body needs an author
//!  ├─ 2. Image     explicit path / URL, or random from the image corpus
//!  ├─ 3. Quote     explicit body + author, or random from the quote corpus
//!  │               (.txt, .pdf via pdftotext, .docx, .csv)
//!  ├─ 4. Layout    proportional resize, average-width word wrap
//!  ├─ 5. Render    caption drawn at 5/8 height, left-aligned
//!  └─ 6. Archive   {output_dir}/{n}.jpg, n from the index allocator
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use memegen::{MemeConfig, MemeEngine, MemeRequest};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = MemeEngine::new(MemeConfig::default())?;
//!
//!     // Random image, random quote.
//!     let meme = engine.make_meme(MemeRequest::new())?;
//!     println!("{}", meme.path.display());
//!
//!     // Everything explicit.
//!     let meme = engine.make_meme(
//!         MemeRequest::new()
//!             .image("_data/photos/dog/xander_1.jpg")
//!             .quote("To bork or not to bork", "Bork")
//!             .width(400),
//!     )?;
//!     println!("{}", meme.path.display());
//!     Ok(())
//! }
//! ```
//!
//! Quote files can also be parsed on their own:
//!
//! ```rust,no_run
//! let quotes = memegen::parse("_data/DogQuotes/DogQuotesCSV.csv")?;
//! for q in &quotes {
//!     println!("{q}");
//! }
//! # Ok::<(), memegen::MemeError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `meme` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! memegen = { version = "0.1", default-features = false }
//! ```
//!
//! ## External Tools
//!
//! PDF quote files need `pdftotext` from poppler-utils on `PATH` (or set
//! [`MemeConfig::pdftotext`]). No other format shells out.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod quote;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{MemeConfig, MemeConfigBuilder, MAX_WIDTH};
pub use engine::{MemeArtifact, MemeEngine, MemeRequest};
pub use error::MemeError;
pub use index::{AtomicIndexAllocator, FileIndexAllocator, IndexAllocator};
pub use pipeline::ingest::{parse, Ingestor, QuoteFormat};
pub use quote::QuoteRecord;
