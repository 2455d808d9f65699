//! Async line streaming.
//!
//! Adapts a `futures-io::AsyncRead` into a stream of lines using the same
//! [`LineAccumulator`](crate::LineAccumulator) as the blocking path. The
//! runtime is up to the caller: tokio, async-std, smol, and others all work.
//!
//! - [`lines_async`] - Creates an async stream of lines from an async reader
//!
//! This module requires the `async-io` feature to be enabled.

mod stream;

pub use stream::{LineStream, lines_async};
