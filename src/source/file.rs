//! Unbuffered file source.

use bytes::Bytes;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::{ChunkSource, read_once};
use crate::error::LineError;

/// Reads a file with one `read` syscall per chunk.
///
/// `std::fs::File` does no buffering of its own, so each
/// [`read_chunk`](ChunkSource::read_chunk) maps to a single read of the
/// descriptor. The handle is closed when the source is dropped.
///
/// # Example
///
/// ```no_run
/// use linesrs::{ChunkSource, FileSource};
///
/// let mut source = FileSource::open("messages.txt")?;
/// let chunk = source.read_chunk(8)?;
/// assert!(chunk.len() <= 8);
/// # Ok::<(), linesrs::LineError>(())
/// ```
#[derive(Debug)]
pub struct FileSource {
    file: File,
    path: Option<PathBuf>,
}

impl FileSource {
    /// Opens `path` read-only.
    ///
    /// # Errors
    ///
    /// [`LineError::NotFound`] if nothing exists at `path`, [`LineError::Io`]
    /// for any other open failure.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LineError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| LineError::from_open(e, path.display().to_string()))?;
        log::debug!("opened {}", path.display());

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wraps an already-open file.
    pub fn from_file(file: File) -> Self {
        Self { file, path: None }
    }

    /// Returns the path the file was opened from, if known.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ChunkSource for FileSource {
    fn read_chunk(&mut self, max_len: usize) -> Result<Bytes, LineError> {
        read_once(&mut self.file, max_len)
    }
}
