//! Pipeline stages for meme composition.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and swapped (a different text measurer, another image backend) without
//! touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ ingest ──▶ layout ──▶ render
//! (image)   (quotes)   (size/wrap) (draw + save)
//! ```
//!
//! 1. [`input`]: resolve the image from a local path, downloaded URL, or a random
//!    pick from the image corpus
//! 2. [`ingest`]: parse quote files (`.txt`, `.pdf`, `.docx`, `.csv`) into
//!    [`crate::QuoteRecord`]s
//! 3. [`layout`]: proportional resize and average-width word wrapping; pure
//!    functions, no I/O
//! 4. [`render`]: decode, resize, draw the caption, write the JPEG

pub mod ingest;
pub mod input;
pub mod layout;
pub mod render;
