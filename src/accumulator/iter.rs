//! Pull-based line iterator over a chunk source.
//!
//! # Example
//!
//! ```no_run
//! use linesrs::{FileSource, LineConfig, LineIter};
//!
//! let source = FileSource::open("messages.txt")?;
//! for line in LineIter::new(source, LineConfig::default()) {
//!     println!("read: {}", line?);
//! }
//! # Ok::<(), linesrs::LineError>(())
//! ```

use std::collections::VecDeque;

use crate::accumulator::LineAccumulator;
use crate::config::LineConfig;
use crate::error::LineError;
use crate::line::Line;
use crate::source::ChunkSource;

/// An iterator that yields lines from a [`ChunkSource`].
///
/// Reads lazily: a chunk is pulled only once every line from the previous one
/// has been handed out. A read error is yielded once and ends the iteration.
/// Decode errors are yielded in place of their line and iteration continues.
pub struct LineIter<S> {
    source: S,
    read_size: usize,
    accumulator: Option<LineAccumulator>,
    ready: VecDeque<Result<Line, LineError>>,
    bytes_read: u64,
}

impl<S: ChunkSource> LineIter<S> {
    /// Creates an iterator reading `config.read_size()` bytes at a time.
    ///
    /// An invalid `config` is yielded as the only item and the source is
    /// never read.
    pub fn new(source: S, config: LineConfig) -> Self {
        if let Err(e) = config.validate() {
            return Self {
                source,
                read_size: 0,
                accumulator: None,
                ready: VecDeque::from([Err(e)]),
                bytes_read: 0,
            };
        }

        Self {
            source,
            read_size: config.read_size(),
            accumulator: Some(LineAccumulator::new(config)),
            ready: VecDeque::new(),
            bytes_read: 0,
        }
    }

    /// Returns the number of bytes pulled from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Consumes the iterator and returns the source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ChunkSource> Iterator for LineIter<S> {
    type Item = Result<Line, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.ready.pop_front() {
                return Some(line);
            }

            let acc = self.accumulator.as_mut()?;
            if acc.is_overflowed() {
                self.accumulator = None;
                return None;
            }

            match self.source.read_chunk(self.read_size) {
                Ok(chunk) if chunk.is_empty() => {
                    return self.accumulator.take().and_then(LineAccumulator::finalize);
                }
                Ok(chunk) => {
                    self.bytes_read += chunk.len() as u64;
                    self.ready.extend(acc.ingest(&chunk));
                }
                Err(e) => {
                    self.accumulator = None;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    struct Scripted(Vec<Result<&'static [u8], ()>>);

    impl ChunkSource for Scripted {
        fn read_chunk(&mut self, _max_len: usize) -> Result<Bytes, LineError> {
            if self.0.is_empty() {
                return Ok(Bytes::new());
            }
            match self.0.remove(0) {
                Ok(chunk) => Ok(Bytes::from_static(chunk)),
                Err(()) => Err(std::io::Error::other("reset").into()),
            }
        }
    }

    #[test]
    fn test_iterates_across_chunks() {
        let source = Scripted(vec![Ok(&b"a\r"[..]), Ok(&b"\nb\nc"[..])]);
        let iter = LineIter::new(source, LineConfig::default());
        let lines: Vec<_> = iter.map(|l| l.unwrap().text).collect();
        assert_eq!(lines, ["a", "b", "c"]);
    }

    #[test]
    fn test_read_error_ends_iteration() {
        let source = Scripted(vec![Ok(&b"one\ntw"[..]), Err(()), Ok(&b"o\n"[..])]);
        let mut iter = LineIter::new(source, LineConfig::default());

        assert_eq!(iter.next().unwrap().unwrap().text, "one");
        assert!(matches!(iter.next(), Some(Err(LineError::Io(_)))));
        assert!(iter.next().is_none());
        assert_eq!(iter.bytes_read(), 6);
    }

    #[test]
    fn test_invalid_config_is_reported_first() {
        let source = Scripted(vec![Ok(&b"a\n"[..])]);
        let mut iter = LineIter::new(source, LineConfig::default().with_read_size(0));

        assert!(matches!(iter.next(), Some(Err(LineError::InvalidConfig { .. }))));
        assert!(iter.next().is_none());
        assert_eq!(iter.into_inner().0.len(), 1);
    }

    #[test]
    fn test_into_inner_returns_unread_source() {
        let source = Scripted(vec![Ok(&b"a\nb"[..]), Ok(&b"\n"[..])]);
        let mut iter = LineIter::new(source, LineConfig::default());

        assert_eq!(iter.next().unwrap().unwrap().text, "a");
        let rest = iter.into_inner();
        assert_eq!(rest.0, [Ok(&b"\n"[..])]);
    }

    #[test]
    fn test_empty_source() {
        let mut iter = LineIter::new(Scripted(vec![]), LineConfig::default());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
