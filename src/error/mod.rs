//! Error types for linesrs.

use std::str::Utf8Error;

use thiserror::Error;

/// Errors that can occur while turning a byte stream into lines.
#[derive(Debug, Error)]
pub enum LineError {
    /// The source path or address does not resolve to an openable resource.
    ///
    /// Raised before any chunk is produced.
    #[error("source not found: {target}")]
    NotFound {
        /// The path or address that could not be opened.
        target: String,
    },

    /// An I/O error occurred on an already-open source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes of one line are not valid UTF-8.
    ///
    /// Scoped to that single line: the accumulator keeps going.
    #[error("line {line} at byte {offset} is not valid utf-8: {source}")]
    Decode {
        /// 1-based number of the offending line.
        line: u64,
        /// Byte offset of the line's first byte in the stream.
        offset: u64,
        /// The underlying decoding failure.
        source: Utf8Error,
    },

    /// A line grew past the configured `max_line_len`.
    #[error("line too long: {len} bytes (max {max})")]
    LineTooLong {
        /// Bytes buffered for the line when the limit was hit.
        len: usize,
        /// The configured limit.
        max: usize,
    },

    /// A driver was used out of lifecycle order.
    #[error("invalid driver state: {message}")]
    InvalidState {
        /// What was attempted.
        message: &'static str,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl LineError {
    /// Returns `true` if the error only affects one line and the stream can
    /// continue past it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LineError::Decode { .. })
    }

    /// Maps an open-time I/O failure to [`LineError::NotFound`] when the
    /// resource does not exist.
    pub(crate) fn from_open(err: std::io::Error, target: impl Into<String>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => LineError::NotFound {
                target: target.into(),
            },
            _ => LineError::Io(err),
        }
    }
}
