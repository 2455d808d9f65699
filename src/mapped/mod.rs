//! Line scanning over memory-mapped files.
//!
//! With the whole file mapped there is nothing to accumulate: the page cache
//! does the buffering and the scanner walks the region directly, slicing lines
//! between separators.
//!
//! - [`MappedSource`] - Read-only mapping of a file, fixed at open time
//! - [`Mapped`] - Result of opening: a region, or `Empty` for a zero-length file
//! - [`MappedScanner`] - Iterator of lines over any byte region
//!
//! # Example
//!
//! ```no_run
//! use linesrs::{DecodePolicy, Mapped, MappedSource};
//!
//! match MappedSource::open("messages.txt")? {
//!     Mapped::Empty => println!("nothing to read"),
//!     Mapped::Region(source) => {
//!         for line in source.lines(DecodePolicy::Strict) {
//!             println!("read: {}", line?);
//!         }
//!     }
//! }
//! # Ok::<(), linesrs::LineError>(())
//! ```

use memchr::memchr;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::config::DecodePolicy;
use crate::error::LineError;
use crate::line::Line;
use crate::util::{LF, decode_line};

/// Outcome of [`MappedSource::open`].
#[derive(Debug)]
pub enum Mapped {
    /// The file has zero length. No mapping was attempted.
    Empty,
    /// The file is mapped and ready to scan.
    Region(MappedSource),
}

/// A read-only mapping of a whole file.
///
/// The mapping covers the file as it was when opened. Bytes appended later
/// are never seen.
#[derive(Debug)]
pub struct MappedSource {
    map: Mmap,
    path: PathBuf,
}

impl MappedSource {
    /// Opens and maps `path`.
    ///
    /// Returns [`Mapped::Empty`] for a zero-length file, since an empty
    /// region cannot be mapped.
    ///
    /// # Errors
    ///
    /// [`LineError::NotFound`] if nothing exists at `path`, [`LineError::Io`]
    /// if reading metadata or mapping fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Mapped, LineError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| LineError::from_open(e, path.display().to_string()))?;

        let len = file.metadata()?.len();
        if len == 0 {
            log::info!("{} is empty, nothing to map", path.display());
            return Ok(Mapped::Empty);
        }

        // SAFETY: the mapping is read-only. Truncating the file from another
        // process while it is mapped is outside what this type can guard.
        #[allow(unsafe_code)]
        let map = unsafe { Mmap::map(&file)? };
        log::debug!("mapped {} bytes of {}", map.len(), path.display());

        Ok(Mapped::Region(Self {
            map,
            path: path.to_path_buf(),
        }))
    }

    /// Returns the mapped bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.map
    }

    /// Returns the size of the mapping in bytes. Never zero.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Always false: empty files are reported as [`Mapped::Empty`].
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the mapped path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scans the mapped region for lines.
    pub fn lines(&self, policy: DecodePolicy) -> MappedScanner<'_> {
        MappedScanner::new(&self.map, policy)
    }
}

/// Iterates the lines of a byte region without copying it.
///
/// Each separator (`\n`, or `\r\n` as one unit) ends a line. Unterminated
/// trailing bytes form a last line, with a lone trailing `\r` stripped the
/// same way [`LineAccumulator::finalize`](crate::LineAccumulator::finalize)
/// does.
#[derive(Debug, Clone)]
pub struct MappedScanner<'a> {
    data: &'a [u8],
    pos: usize,
    lines: u64,
    policy: DecodePolicy,
}

impl<'a> MappedScanner<'a> {
    /// Creates a scanner over `data`.
    pub fn new(data: &'a [u8], policy: DecodePolicy) -> Self {
        Self {
            data,
            pos: 0,
            lines: 0,
            policy,
        }
    }

    /// Returns the offset of the next byte to scan.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for MappedScanner<'_> {
    type Item = Result<Line, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.data.get(self.pos..).filter(|r| !r.is_empty())?;
        let offset = self.pos as u64;

        let body = match memchr(LF, rest) {
            Some(sep) => {
                self.pos += sep + 1;
                &rest[..sep]
            }
            None => {
                self.pos = self.data.len();
                rest
            }
        };

        self.lines += 1;
        Some(decode_line(body, self.policy, self.lines, offset))
    }
}
