//! Configuration for line splitting.
//!
//! - [`LineConfig`] - Read granularity, line-length guard and decoding
//! - [`DecodePolicy`] - How line bytes become text
//! - [`DecodeErrorAction`] - What the driver does with an undecodable line
//!
//! # Example
//!
//! ```
//! use linesrs::{DecodePolicy, LineConfig};
//!
//! let config = LineConfig::new(4096)?
//!     .with_max_line_len(Some(1 << 20))
//!     .with_decode_policy(DecodePolicy::Lossy);
//!
//! assert_eq!(config.read_size(), 4096);
//! # Ok::<(), linesrs::LineError>(())
//! ```

use crate::error::LineError;

/// Default number of bytes requested per `read_chunk` call (8 KiB).
pub const DEFAULT_READ_SIZE: usize = 8 * 1024;

/// How the bytes of a line are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecodePolicy {
    /// Invalid UTF-8 yields a per-line [`LineError::Decode`].
    #[default]
    Strict,
    /// Invalid sequences are replaced with U+FFFD.
    Lossy,
}

/// What a [`Driver`](crate::Driver) does when a line fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecodeErrorAction {
    /// Stop the stream and return the error.
    #[default]
    Abort,
    /// Log the error, drop the line and keep reading.
    Skip,
}

/// Configuration for line splitting.
///
/// `read_size` bounds each chunk pulled from a source. It has no effect on
/// which lines come out, only on how many reads it takes.
///
/// `max_line_len` is off by default: a stream with no separators grows the
/// pending buffer without bound unless a limit is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineConfig {
    read_size: usize,
    max_line_len: Option<usize>,
    decode: DecodePolicy,
    on_decode_error: DecodeErrorAction,
}

impl LineConfig {
    /// Creates a new configuration with the given read granularity.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::InvalidConfig`] if `read_size` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use linesrs::LineConfig;
    ///
    /// let config = LineConfig::new(8)?;
    /// assert_eq!(config.read_size(), 8);
    /// assert!(LineConfig::new(0).is_err());
    /// # Ok::<(), linesrs::LineError>(())
    /// ```
    pub fn new(read_size: usize) -> Result<Self, LineError> {
        let config = Self {
            read_size,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the read granularity.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`LineConfig::validate`] to check it.
    pub fn with_read_size(mut self, size: usize) -> Self {
        self.read_size = size;
        self
    }

    /// Sets the maximum line length in bytes, excluding the separator.
    ///
    /// `None` disables the guard.
    pub fn with_max_line_len(mut self, max: Option<usize>) -> Self {
        self.max_line_len = max;
        self
    }

    /// Sets the decode policy.
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode = policy;
        self
    }

    /// Sets the driver's reaction to undecodable lines.
    pub fn with_decode_error_action(mut self, action: DecodeErrorAction) -> Self {
        self.on_decode_error = action;
        self
    }

    /// Returns the read granularity.
    pub fn read_size(&self) -> usize {
        self.read_size
    }

    /// Returns the line-length limit, if any.
    pub fn max_line_len(&self) -> Option<usize> {
        self.max_line_len
    }

    /// Returns the decode policy.
    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode
    }

    /// Returns the driver's reaction to undecodable lines.
    pub fn decode_error_action(&self) -> DecodeErrorAction {
        self.on_decode_error
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use linesrs::LineConfig;
    ///
    /// let config = LineConfig::default().with_read_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), LineError> {
        if self.read_size == 0 {
            return Err(LineError::InvalidConfig {
                message: "read_size must be non-zero",
            });
        }

        if self.max_line_len == Some(0) {
            return Err(LineError::InvalidConfig {
                message: "max_line_len must be non-zero when set",
            });
        }

        Ok(())
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            read_size: DEFAULT_READ_SIZE,
            max_line_len: None,
            decode: DecodePolicy::default(),
            on_decode_error: DecodeErrorAction::default(),
        }
    }
}
