//! Async stream adapter for line splitting.
//!
//! # Example
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

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::accumulator::LineAccumulator;
use crate::config::LineConfig;
use crate::error::LineError;
use crate::line::Line;

pin_project! {
    /// A stream that yields lines from an async reader.
    ///
    /// Same semantics as [`LineIter`](crate::LineIter): a read error is
    /// yielded once and ends the stream, decode errors stand in for their
    /// line and the stream goes on.
    pub struct LineStream<R> {
        #[pin]
        reader: R,
        buffer: Vec<u8>,
        accumulator: Option<LineAccumulator>,
        ready: VecDeque<Result<Line, LineError>>,
    }
}

impl<R> LineStream<R> {
    /// Creates a stream reading `config.read_size()` bytes at a time.
    ///
    /// An invalid `config` is yielded as the only item.
    pub fn new(reader: R, config: LineConfig) -> Self {
        if let Err(e) = config.validate() {
            return Self {
                reader,
                buffer: Vec::new(),
                accumulator: None,
                ready: VecDeque::from([Err(e)]),
            };
        }

        Self {
            reader,
            buffer: vec![0u8; config.read_size()],
            accumulator: Some(LineAccumulator::new(config)),
            ready: VecDeque::new(),
        }
    }
}

impl<R: AsyncRead> Stream for LineStream<R> {
    type Item = Result<Line, LineError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(line) = this.ready.pop_front() {
                return Poll::Ready(Some(line));
            }

            let Some(acc) = this.accumulator.as_mut() else {
                return Poll::Ready(None);
            };
            if acc.is_overflowed() {
                *this.accumulator = None;
                return Poll::Ready(None);
            }

            match this.reader.as_mut().poll_read(cx, &mut this.buffer[..]) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) => {
                    *this.accumulator = None;
                    return Poll::Ready(Some(Err(LineError::Io(e))));
                }
                Poll::Ready(Ok(0)) => {
                    let last = this.accumulator.take().and_then(LineAccumulator::finalize);
                    return Poll::Ready(last);
                }
                Poll::Ready(Ok(n)) => {
                    let lines = acc.ingest(&this.buffer[..n]);
                    this.ready.extend(lines);
                }
            }
        }
    }
}

/// Creates a line stream from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O. Tokio users
/// can adapt their readers with `tokio_util::compat`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use linesrs::{lines_async, LineConfig};
///
/// let (socket, _) = listener.accept().await?;
/// let stream = lines_async(socket.compat(), LineConfig::default());
/// ```
pub fn lines_async<R: AsyncRead>(reader: R, config: LineConfig) -> LineStream<R> {
    LineStream::new(reader, config)
}
