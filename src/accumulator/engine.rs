//! Core splitting engine - LineAccumulator with streaming API.
//!
//! - [`LineAccumulator`] - Stateful splitter that turns arbitrary chunks into lines
//! - `ingest()` - Feed bytes in any size (1 byte, 8 KiB, 1 MiB, etc.)
//! - `finalize()` - Flush the unterminated tail once the stream has ended
//!
//! # Example
//!
//! ```
//! use linesrs::{LineAccumulator, LineConfig};
//!
//! let mut acc = LineAccumulator::new(LineConfig::default());
//!
//! let lines = acc.ingest(b"a\r\nb\nc");
//! let texts: Vec<_> = lines.into_iter().map(|l| l.unwrap().text).collect();
//! assert_eq!(texts, ["a", "b"]);
//!
//! let last = acc.finalize().unwrap()?;
//! assert_eq!(last.text, "c");
//! # Ok::<(), linesrs::LineError>(())
//! ```

use bytes::BytesMut;
use memchr::memchr;

use crate::config::LineConfig;
use crate::error::LineError;
use crate::line::Line;
use crate::util::{LF, decode_line, trim_cr};

/// A stateful splitter that turns a chunked byte stream into lines.
///
/// Bytes that do not yet end in a line feed stay in a pending buffer until a
/// later `ingest()` completes them or `finalize()` flushes them.
///
/// # Determinism
///
/// The emitted lines depend only on the concatenated input, never on how it
/// was split into chunks: one big chunk, single bytes or anything in between
/// yield the same sequence.
///
/// # Memory Considerations
///
/// Without `max_line_len` the pending buffer is unbounded. A source that never
/// sends a line feed keeps growing it until memory runs out.
#[derive(Debug)]
pub struct LineAccumulator {
    pending: BytesMut,
    /// Stream offset of `pending[0]`.
    offset: u64,
    lines: u64,
    overflowed: bool,
    config: LineConfig,
}

impl LineAccumulator {
    /// Creates an empty accumulator.
    ///
    /// # Example
    ///
    /// ```
    /// use linesrs::{LineAccumulator, LineConfig};
    ///
    /// let acc = LineAccumulator::new(LineConfig::default());
    /// assert_eq!(acc.pending_len(), 0);
    /// ```
    pub fn new(config: LineConfig) -> Self {
        Self {
            pending: BytesMut::new(),
            offset: 0,
            lines: 0,
            overflowed: false,
            config,
        }
    }

    /// Appends a chunk and returns every line it completes, in stream order.
    ///
    /// Each item is either a decoded [`Line`] or an error scoped to that line
    /// ([`LineError::Decode`]). With `max_line_len` set, the last item may be
    /// [`LineError::LineTooLong`]; the accumulator is then terminal and
    /// ignores further input.
    ///
    /// An empty chunk is a no-op. End-of-stream is signalled with
    /// [`finalize`](Self::finalize), not with an empty ingest.
    ///
    /// # Example
    ///
    /// ```
    /// use linesrs::{LineAccumulator, LineConfig};
    ///
    /// let mut acc = LineAccumulator::new(LineConfig::default());
    /// assert!(acc.ingest(b"hel").is_empty());
    ///
    /// let lines = acc.ingest(b"lo\n\nwor");
    /// assert_eq!(lines.len(), 2);
    /// assert_eq!(acc.pending_len(), 3);
    /// ```
    pub fn ingest(&mut self, chunk: &[u8]) -> Vec<Result<Line, LineError>> {
        let mut lines = Vec::new();
        if chunk.is_empty() || self.overflowed {
            return lines;
        }

        // Everything already pending was scanned by the previous call.
        let mut scan_from = self.pending.len();
        self.pending.extend_from_slice(chunk);

        while let Some(pos) = memchr(LF, &self.pending[scan_from..]) {
            let sep = scan_from + pos;
            let len = trim_cr(&self.pending[..sep]).len();
            if let Err(e) = self.check_len(len) {
                lines.push(Err(e));
                return lines;
            }

            let raw = self.pending.split_to(sep + 1);
            lines.push(self.emit(&raw[..sep], raw.len()));
            scan_from = 0;
        }

        let len = trim_cr(&self.pending).len();
        if let Err(e) = self.check_len(len) {
            lines.push(Err(e));
        }

        lines
    }

    /// Flushes the unterminated tail of the stream as a final line.
    ///
    /// Returns `None` when nothing is pending. A trailing carriage return in
    /// the tail is stripped even though no line feed follows it, so the last
    /// line is treated like every other.
    ///
    /// Consumes the accumulator: a stream ends exactly once.
    ///
    /// # Example
    ///
    /// ```
    /// use linesrs::{LineAccumulator, LineConfig};
    ///
    /// let mut acc = LineAccumulator::new(LineConfig::default());
    /// acc.ingest(b"no-newline");
    /// assert_eq!(acc.finalize().unwrap()?.text, "no-newline");
    ///
    /// let acc = LineAccumulator::new(LineConfig::default());
    /// assert!(acc.finalize().is_none());
    /// # Ok::<(), linesrs::LineError>(())
    /// ```
    pub fn finalize(mut self) -> Option<Result<Line, LineError>> {
        if self.overflowed || self.pending.is_empty() {
            return None;
        }

        let raw = self.pending.split();
        Some(self.emit(&raw, raw.len()))
    }

    /// Returns the number of bytes waiting for a line feed.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns the stream offset of the first pending byte.
    ///
    /// Equals the number of bytes consumed into emitted lines, separators
    /// included.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns how many lines have been emitted, including ones that failed
    /// to decode.
    pub fn lines_emitted(&self) -> u64 {
        self.lines
    }

    /// Returns true once a line exceeded `max_line_len`.
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Returns the configuration used by this accumulator.
    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    /// Decodes one line and advances the position by `consumed` bytes.
    fn emit(&mut self, body: &[u8], consumed: usize) -> Result<Line, LineError> {
        self.lines += 1;
        let line = decode_line(body, self.config.decode_policy(), self.lines, self.offset);
        self.offset += consumed as u64;
        line
    }

    /// Enforces `max_line_len` on a line body of `len` bytes, CR excluded.
    fn check_len(&mut self, len: usize) -> Result<(), LineError> {
        let Some(max) = self.config.max_line_len() else {
            return Ok(());
        };

        if len <= max {
            return Ok(());
        }

        log::warn!("line {} exceeds {} bytes, dropping stream", self.lines + 1, max);
        self.overflowed = true;
        self.pending.clear();
        Err(LineError::LineTooLong { len, max })
    }
}

impl Default for LineAccumulator {
    fn default() -> Self {
        Self::new(LineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodePolicy;

    fn texts(lines: Vec<Result<Line, LineError>>) -> Vec<String> {
        lines.into_iter().map(|l| l.unwrap().text).collect()
    }

    #[test]
    fn test_separator_at_start() {
        let mut acc = LineAccumulator::default();
        assert_eq!(texts(acc.ingest(b"\nx")), [""]);
        assert_eq!(acc.pending_len(), 1);
    }

    #[test]
    fn test_consecutive_separators() {
        let mut acc = LineAccumulator::default();
        assert_eq!(texts(acc.ingest(b"a\n\nb\n")), ["a", "", "b"]);
        assert_eq!(acc.pending_len(), 0);
    }

    #[test]
    fn test_lone_cr_mid_stream_is_kept() {
        let mut acc = LineAccumulator::default();
        assert_eq!(texts(acc.ingest(b"a\rb\n")), ["a\rb"]);
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut acc = LineAccumulator::default();
        assert!(acc.ingest(b"a\r").is_empty());
        assert_eq!(texts(acc.ingest(b"\nb")), ["a"]);
    }

    #[test]
    fn test_finalize_strips_lone_trailing_cr() {
        let mut acc = LineAccumulator::default();
        acc.ingest(b"tail\r");
        assert_eq!(acc.finalize().unwrap().unwrap().text, "tail");
    }

    #[test]
    fn test_positions() {
        let mut acc = LineAccumulator::default();
        let lines: Vec<_> = acc
            .ingest(b"ab\r\ncd\n")
            .into_iter()
            .map(Result::unwrap)
            .collect();

        assert_eq!(lines[0], Line::at("ab", 1, 0));
        assert_eq!(lines[1], Line::at("cd", 2, 4));
        assert_eq!(acc.offset(), 7);
        assert_eq!(acc.lines_emitted(), 2);
    }

    #[test]
    fn test_decode_error_is_scoped_to_one_line() {
        let mut acc = LineAccumulator::default();
        let lines = acc.ingest(b"ok\n\xff\xfe\nstill ok\n");

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].as_ref().unwrap().text, "ok");
        assert!(matches!(lines[1], Err(LineError::Decode { line: 2, offset: 3, .. })));
        assert_eq!(lines[2].as_ref().unwrap().text, "still ok");
    }

    #[test]
    fn test_lossy_decode() {
        let config = LineConfig::default().with_decode_policy(DecodePolicy::Lossy);
        let mut acc = LineAccumulator::new(config);
        assert_eq!(texts(acc.ingest(b"a\xffb\n")), ["a\u{fffd}b"]);
    }

    #[test]
    fn test_max_line_len_on_complete_line() {
        let config = LineConfig::default().with_max_line_len(Some(3));
        let mut acc = LineAccumulator::new(config);

        let lines = acc.ingest(b"abc\r\nabcd\nzz\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_ref().unwrap().text, "abc");
        assert!(matches!(lines[1], Err(LineError::LineTooLong { len: 4, max: 3 })));

        assert!(acc.is_overflowed());
        assert!(acc.ingest(b"more\n").is_empty());
        assert!(acc.finalize().is_none());
    }

    #[test]
    fn test_max_line_len_on_pending_tail() {
        let config = LineConfig::default().with_max_line_len(Some(4));
        let mut acc = LineAccumulator::new(config);

        assert!(acc.ingest(b"abcd\r").is_empty());
        let lines = acc.ingest(b"e");
        assert!(matches!(lines[..], [Err(LineError::LineTooLong { len: 6, max: 4 })]));
        assert_eq!(acc.pending_len(), 0);
    }

    #[test]
    fn test_empty_ingest_is_noop() {
        let mut acc = LineAccumulator::default();
        acc.ingest(b"x");
        assert!(acc.ingest(b"").is_empty());
        assert_eq!(acc.pending_len(), 1);
    }
}
