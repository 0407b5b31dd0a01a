//! TCP socket configuration utilities
//!
//! Keepalive and nodelay settings applied to every dialed socket.

use socket2::SockRef;
use tokio::net::TcpStream;

use crate::config::DialerConfig;

/// Apply the configured socket options to a freshly connected stream.
///
/// Keepalive is switched on without idle, interval or count overrides so the
/// operating system's tuning applies.
pub fn configure_tcp_socket(stream: &TcpStream, config: &DialerConfig) -> std::io::Result<()> {
    if config.tcp_nodelay {
        stream.set_nodelay(true)?;
    }

    if config.tcp_keepalive {
        SockRef::from(stream).set_keepalive(true)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use socket2::SockRef;
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    #[tokio::test]
    async fn enables_keepalive_and_nodelay() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let stream = TcpStream::connect(addr).await.expect("connect");

        configure_tcp_socket(&stream, &DialerConfig::default()).expect("configure");

        assert!(SockRef::from(&stream).keepalive().expect("keepalive"));
        assert!(stream.nodelay().expect("nodelay"));
    }

    #[tokio::test]
    async fn respects_disabled_options() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let stream = TcpStream::connect(addr).await.expect("connect");

        let config = DialerConfig::default().tcp_keepalive(false).tcp_nodelay(false);
        configure_tcp_socket(&stream, &config).expect("configure");

        assert!(!SockRef::from(&stream).keepalive().expect("keepalive"));
    }
}
