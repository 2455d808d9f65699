//! linesrs
//!
//! Incremental line splitting for Rust.
//!
//! `linesrs` turns a byte stream that arrives in arbitrary, non-line-aligned
//! chunks into an ordered sequence of text lines. It handles:
//!
//! - lines straddling chunk boundaries
//! - CRLF normalization (`\r\n` is one separator)
//! - empty input
//! - end-of-stream with or without a trailing separator
//!
//! The crate intentionally:
//! - does NOT serve more than one connection per driver
//! - does NOT speak any protocol above "bytes delimited by `\n`"
//! - does NOT print or log lines for you; a sink receives them
//!
//! It only does one thing: **Read bytes → yield lines**
//!
//! # Sync
//!
//! ```no_run
//! use linesrs::{Driver, FileSource, Line, LineConfig, LineError};
//!
//! fn main() -> Result<(), LineError> {
//!     let mut driver = Driver::new(LineConfig::default());
//!     driver.open(|| FileSource::open("messages.txt"))?;
//!     driver.run(&mut |line: Line| println!("read: {line}"))?;
//!     Ok(())
//! }
//! ```
//!
//! # Push API
//!
//! ```
//! use linesrs::{LineAccumulator, LineConfig};
//!
//! let mut acc = LineAccumulator::new(LineConfig::default());
//! for chunk in [&b"a\r"[..], &b"\nb\nc"[..]] {
//!     for line in acc.ingest(chunk) {
//!         println!("{}", line?);
//!     }
//! }
//! if let Some(line) = acc.finalize() {
//!     println!("{}", line?);
//! }
//! # Ok::<(), linesrs::LineError>(())
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use linesrs::{lines_async, LineConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), linesrs::LineError> {
//!     let mut stream = lines_async(reader, LineConfig::default());
//!
//!     while let Some(line) = stream.next().await {
//!         println!("read: {}", line?);
//!     }
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod accumulator;
mod config;
mod driver;
mod error;
mod line;
mod mapped;
mod source;

mod util; // internal separator and decoding rules

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface
//

pub use accumulator::{LineAccumulator, LineIter};
pub use config::{DEFAULT_READ_SIZE, DecodeErrorAction, DecodePolicy, LineConfig};
pub use driver::{Driver, DriverReport, DriverState, LineSink, StreamStatus, drive_mapped};
pub use error::LineError;
pub use line::Line;
pub use mapped::{Mapped, MappedScanner, MappedSource};
pub use source::{ChunkSource, DEFAULT_ADDR, FileSource, SocketListener, SocketSource, Source};

#[cfg(feature = "async-io")]
pub use async_stream::{LineStream, lines_async};
