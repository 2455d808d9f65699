//! Byte sources.
//!
//! A source hands out the stream one bounded chunk at a time and signals the
//! end with an empty chunk. The set of transports is closed and picked when the
//! source is built:
//!
//! - [`FileSource`] - Unbuffered reads from a file
//! - [`SocketSource`] - Receives from one connected TCP stream
//! - [`Source`] - Either of the above behind one type
//!
//! Memory-mapped files do not go through this trait, see
//! [`MappedSource`](crate::MappedSource).

mod file;
mod socket;

use bytes::{Bytes, BytesMut};
use std::io::Read;

use crate::error::LineError;

pub use file::FileSource;
pub use socket::{DEFAULT_ADDR, SocketListener, SocketSource};

/// Something that yields a byte stream in bounded chunks.
pub trait ChunkSource {
    /// Reads the next chunk of at most `max_len` bytes.
    ///
    /// Blocks until data is available. An empty chunk means end-of-stream.
    ///
    /// # Errors
    ///
    /// [`LineError::Io`] if the underlying read fails. The stream is over at
    /// that point: callers must not read again.
    fn read_chunk(&mut self, max_len: usize) -> Result<Bytes, LineError>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    fn read_chunk(&mut self, max_len: usize) -> Result<Bytes, LineError> {
        (**self).read_chunk(max_len)
    }
}

/// One of the built-in transports.
#[derive(Debug)]
pub enum Source {
    /// A file opened by path or handed in.
    File(FileSource),
    /// One accepted TCP connection.
    Socket(SocketSource),
}

impl ChunkSource for Source {
    fn read_chunk(&mut self, max_len: usize) -> Result<Bytes, LineError> {
        match self {
            Source::File(file) => file.read_chunk(max_len),
            Source::Socket(socket) => socket.read_chunk(max_len),
        }
    }
}

impl From<FileSource> for Source {
    fn from(source: FileSource) -> Self {
        Source::File(source)
    }
}

impl From<SocketSource> for Source {
    fn from(source: SocketSource) -> Self {
        Source::Socket(source)
    }
}

/// Issues exactly one `read` of at most `max_len` bytes.
pub(crate) fn read_once<R: Read>(reader: &mut R, max_len: usize) -> Result<Bytes, LineError> {
    if max_len == 0 {
        return Err(LineError::InvalidConfig {
            message: "read_chunk needs a non-zero max_len",
        });
    }

    let mut buf = BytesMut::zeroed(max_len);
    let n = reader.read(&mut buf)?;
    buf.truncate(n);
    Ok(buf.freeze())
}
