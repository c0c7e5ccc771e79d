//! Image source resolution: explicit path, URL, or random corpus pick.
//!
//! ## Why download to a temp directory?
//!
//! The decoder wants a file path, and a remote image must not outlive the
//! request that fetched it. Downloading into a [`TempDir`] owned by
//! [`ResolvedImage`] gives the renderer a path while guaranteeing cleanup
//! when the value is dropped, whether rendering succeeded or not. Bytes are
//! sniffed before returning so a HTML error page is reported as
//! [`MemeError::NotAnImage`] rather than as a decoder failure later.

use crate::error::MemeError;
use crate::pipeline::ingest::{list_files, suffix_of};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Suffixes eligible for random selection from the image corpus.
pub const IMAGE_SUFFIXES: [&str; 2] = [".jpg", ".png"];

/// The resolved image, either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedImage {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the image lives in a temp directory that is removed
    /// when this value is dropped.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedImage {
    /// Path to the image regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedImage::Local(p) => p,
            ResolvedImage::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve `input` to a local image file.
///
/// URLs are downloaded; anything else is taken as a local path as-is.
/// Existence is not checked here: opening the file enforces it.
pub async fn resolve_image(input: &str, timeout_secs: u64) -> Result<ResolvedImage, MemeError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        debug!("Using local image: {}", input);
        Ok(ResolvedImage::Local(PathBuf::from(input)))
    }
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedImage, MemeError> {
    info!("Downloading image from: {}", url);

    let failed = |reason: String| MemeError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            MemeError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let filename = extract_filename(url);
    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;

    let temp_dir = TempDir::new().map_err(|e| MemeError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(filename);

    if image::guess_format(&bytes).is_err() {
        return Err(MemeError::NotAnImage { path: file_path });
    }

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| MemeError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedImage::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Last path segment of the URL when it looks like a file name.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.img".to_string()
}

/// `.jpg` / `.png` files directly inside `dir`, sorted by path.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, MemeError> {
    Ok(list_files(dir)?
        .into_iter()
        .filter(|p| IMAGE_SUFFIXES.contains(&suffix_of(p).as_str()))
        .collect())
}

/// Pick one image uniformly at random from the corpus in `dir`.
pub fn pick_random_image<R: Rng + ?Sized>(dir: &Path, rng: &mut R) -> Result<PathBuf, MemeError> {
    let images = list_images(dir)?;
    let chosen = images.choose(rng).cloned().ok_or_else(|| MemeError::EmptyCorpus {
        dir: dir.to_path_buf(),
        kind: "images",
    })?;
    debug!("Picked image {} of {} in {}", chosen.display(), images.len(), dir.display());
    Ok(chosen)
}
