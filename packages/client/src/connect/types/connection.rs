//! Dialed connection types
//!
//! Every successful dial produces a [`TunnelConnection`]: the bare socket for
//! direct connections and tunnels with nothing read ahead, or a
//! [`BufferedConnection`] when tunnel bytes arrived with the proxy's reply.

use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;

use super::buffered::BufferedConnection;

/// Connection trait for the stream types a dial can hand out
pub trait ConnectionTrait: AsyncRead + AsyncWrite + std::fmt::Debug + Send + Sync + Unpin {
    /// Get the peer address of this connection.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the peer address cannot be determined.
    fn peer_addr(&self) -> io::Result<SocketAddr>;

    /// Get the local address of this connection.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the local address cannot be determined.
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl ConnectionTrait for TcpStream {
    fn peer_addr(&self) -> io::Result<SocketAddr> {
        TcpStream::peer_addr(self)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpStream::local_addr(self)
    }
}

impl ConnectionTrait for BufferedConnection {
    fn peer_addr(&self) -> io::Result<SocketAddr> {
        BufferedConnection::peer_addr(self)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        BufferedConnection::local_addr(self)
    }
}

/// The stream returned by a dial.
#[derive(Debug)]
pub enum TunnelConnection {
    /// Plain socket, to the target or to the proxy after a clean handshake.
    Raw(TcpStream),
    /// Tunnel socket with bytes that were read past the CONNECT response.
    Buffered(BufferedConnection),
}

impl TunnelConnection {
    /// Build from a socket and the bytes left over from the handshake.
    #[must_use]
    pub fn from_parts(leftover: Bytes, stream: TcpStream) -> Self {
        if leftover.is_empty() {
            TunnelConnection::Raw(stream)
        } else {
            TunnelConnection::Buffered(BufferedConnection::new(leftover, stream))
        }
    }

    /// Whether reads are currently served from read-ahead bytes.
    #[must_use]
    pub fn is_buffered(&self) -> bool {
        matches!(self, TunnelConnection::Buffered(_))
    }

    /// Number of read-ahead bytes not yet consumed.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        match self {
            TunnelConnection::Raw(_) => 0,
            TunnelConnection::Buffered(conn) => conn.buffered().len(),
        }
    }

    /// The underlying socket.
    #[must_use]
    pub fn tcp_stream(&self) -> &TcpStream {
        match self {
            TunnelConnection::Raw(stream) => stream,
            TunnelConnection::Buffered(conn) => conn.get_ref(),
        }
    }

    /// Split into unread bytes and the socket.
    #[must_use]
    pub fn into_parts(self) -> (Bytes, TcpStream) {
        match self {
            TunnelConnection::Raw(stream) => (Bytes::new(), stream),
            TunnelConnection::Buffered(conn) => conn.into_parts(),
        }
    }

    /// Remote address: the proxy when tunneled, the target when direct.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.tcp_stream().peer_addr()
    }

    /// Local address of the socket.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.tcp_stream().local_addr()
    }
}

impl ConnectionTrait for TunnelConnection {
    fn peer_addr(&self) -> io::Result<SocketAddr> {
        TunnelConnection::peer_addr(self)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TunnelConnection::local_addr(self)
    }
}

impl From<TcpStream> for TunnelConnection {
    fn from(stream: TcpStream) -> Self {
        TunnelConnection::Raw(stream)
    }
}

impl AsyncRead for TunnelConnection {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            TunnelConnection::Raw(stream) => Pin::new(stream).poll_read(cx, buf),
            TunnelConnection::Buffered(conn) => Pin::new(conn).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for TunnelConnection {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            TunnelConnection::Raw(stream) => Pin::new(stream).poll_write(cx, buf),
            TunnelConnection::Buffered(conn) => Pin::new(conn).poll_write(cx, buf),
        }
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            TunnelConnection::Raw(stream) => Pin::new(stream).poll_write_vectored(cx, bufs),
            TunnelConnection::Buffered(conn) => Pin::new(conn).poll_write_vectored(cx, bufs),
        }
    }

    fn is_write_vectored(&self) -> bool {
        self.tcp_stream().is_write_vectored()
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            TunnelConnection::Raw(stream) => Pin::new(stream).poll_flush(cx),
            TunnelConnection::Buffered(conn) => Pin::new(conn).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            TunnelConnection::Raw(stream) => Pin::new(stream).poll_shutdown(cx),
            TunnelConnection::Buffered(conn) => Pin::new(conn).poll_shutdown(cx),
        }
    }
}
