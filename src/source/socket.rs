//! Single-connection TCP source.

use bytes::Bytes;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use super::{ChunkSource, read_once};
use crate::error::LineError;

/// Loopback address the bundled demos listen on.
pub const DEFAULT_ADDR: &str = "127.0.0.1:42069";

/// A bound listener that hands out exactly one connection.
///
/// Split from [`SocketSource::accept`] so callers can learn the bound address
/// (for example after binding port 0) before blocking on the peer.
#[derive(Debug)]
pub struct SocketListener {
    listener: TcpListener,
}

impl SocketListener {
    /// Binds to `addr`.
    ///
    /// # Errors
    ///
    /// [`LineError::NotFound`] if `addr` does not resolve, [`LineError::Io`]
    /// if binding fails.
    pub fn bind(addr: &str) -> Result<Self, LineError> {
        let not_found = || LineError::NotFound {
            target: addr.to_owned(),
        };

        let addrs: Vec<SocketAddr> = addr.to_socket_addrs().map_err(|_| not_found())?.collect();
        if addrs.is_empty() {
            return Err(not_found());
        }

        let listener = TcpListener::bind(&addrs[..])?;
        log::debug!("listening on {}", listener.local_addr()?);
        Ok(Self { listener })
    }

    /// Returns the address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, LineError> {
        Ok(self.listener.local_addr()?)
    }

    /// Blocks until one peer connects, then closes the listener.
    pub fn accept_one(self) -> Result<SocketSource, LineError> {
        let (stream, peer) = self.listener.accept()?;
        log::info!("connected by {peer}");
        Ok(SocketSource {
            stream,
            peer: Some(peer),
        })
    }
}

/// Receives from one connected TCP stream.
///
/// Each [`read_chunk`](ChunkSource::read_chunk) issues one receive. An orderly
/// close by the peer shows up as the empty end-of-stream chunk. Only one
/// connection is ever serviced; run one source per connection.
#[derive(Debug)]
pub struct SocketSource {
    stream: TcpStream,
    peer: Option<SocketAddr>,
}

impl SocketSource {
    /// Binds to `addr` and blocks until exactly one peer connects.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use linesrs::{DEFAULT_ADDR, SocketSource};
    ///
    /// let source = SocketSource::accept(DEFAULT_ADDR)?;
    /// println!("peer: {:?}", source.peer_addr());
    /// # Ok::<(), linesrs::LineError>(())
    /// ```
    pub fn accept(addr: &str) -> Result<Self, LineError> {
        SocketListener::bind(addr)?.accept_one()
    }

    /// Wraps an already-connected stream.
    pub fn new(stream: TcpStream) -> Self {
        let peer = stream.peer_addr().ok();
        Self { stream, peer }
    }

    /// Returns the remote address, if known.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

impl From<TcpStream> for SocketSource {
    fn from(stream: TcpStream) -> Self {
        Self::new(stream)
    }
}

impl ChunkSource for SocketSource {
    fn read_chunk(&mut self, max_len: usize) -> Result<Bytes, LineError> {
        read_once(&mut self.stream, max_len)
    }
}
