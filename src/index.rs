//! Sequence-index allocation for output file names.
//!
//! Every meme is written as `{n}.jpg` where `n` comes from an
//! [`IndexAllocator`]. Two implementations ship:
//!
//! * [`FileIndexAllocator`]: the counter lives in a text file holding one
//!   non-negative integer, so numbering survives restarts. Allocation reads
//!   the file and then rewrites it incremented. A mutex serialises callers
//!   that share one allocator, but the read and the write are separate
//!   filesystem operations with no file lock: **two processes using the same
//!   counter file can allocate the same index or skip one.** Give each process
//!   its own output directory and counter, or use [`AtomicIndexAllocator`].
//! * [`AtomicIndexAllocator`]: an in-memory atomic counter, race-free within
//!   a process, reset on restart.

use crate::error::MemeError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::debug;

/// Hands out output sequence numbers.
///
/// Implementations must be `Send + Sync` so an engine can be shared between
/// request handlers.
pub trait IndexAllocator: Send + Sync {
    /// Return the next unused index and advance the counter.
    fn allocate(&self) -> Result<u64, MemeError>;

    /// The index the next [`allocate`](Self::allocate) call will return,
    /// without advancing.
    fn peek(&self) -> Result<u64, MemeError>;
}

/// Counter persisted in a text file. See the module docs for the
/// multi-process caveat.
#[derive(Debug)]
pub struct FileIndexAllocator {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileIndexAllocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<u64, MemeError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(MemeError::from_io(&self.path, e)),
        };
        content
            .trim()
            .parse::<u64>()
            .map_err(|_| MemeError::IndexCorrupt {
                path: self.path.clone(),
                content: content.trim().to_string(),
            })
    }

    fn write(&self, value: u64) -> Result<(), MemeError> {
        let write_failed = |e: std::io::Error| MemeError::OutputWriteFailed {
            path: self.path.clone(),
            detail: e.to_string(),
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_failed)?;
        }
        std::fs::write(&self.path, value.to_string()).map_err(write_failed)
    }
}

impl IndexAllocator for FileIndexAllocator {
    fn allocate(&self) -> Result<u64, MemeError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| MemeError::Internal("index lock poisoned".into()))?;
        let current = self.read()?;
        self.write(current + 1)?;
        debug!("Allocated index {} from {}", current, self.path.display());
        Ok(current)
    }

    fn peek(&self) -> Result<u64, MemeError> {
        self.read()
    }
}

/// In-memory counter.
#[derive(Debug, Default)]
pub struct AtomicIndexAllocator {
    next: AtomicU64,
}

impl AtomicIndexAllocator {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl IndexAllocator for AtomicIndexAllocator {
    fn allocate(&self) -> Result<u64, MemeError> {
        Ok(self.next.fetch_add(1, Ordering::SeqCst))
    }

    fn peek(&self) -> Result<u64, MemeError> {
        Ok(self.next.load(Ordering::SeqCst))
    }
}
