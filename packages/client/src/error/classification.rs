use std::error::Error as StdError;
use std::io;

use http::StatusCode;

use super::helpers::{OperationCanceled, TimedOut};
use super::types::{Error, Kind};

impl Error {
    /// Returns true if the target address or proxy URL could not be resolved.
    #[must_use]
    pub fn is_resolution(&self) -> bool {
        matches!(self.inner.kind, Kind::Resolution)
    }

    /// Returns true if the TCP connection could not be established.
    #[must_use]
    pub fn is_dial(&self) -> bool {
        matches!(self.inner.kind, Kind::Dial)
    }

    /// Returns true if the CONNECT handshake failed while writing or reading.
    #[must_use]
    pub fn is_handshake(&self) -> bool {
        matches!(self.inner.kind, Kind::HandshakeWrite | Kind::HandshakeRead)
    }

    /// Returns true if the proxy refused the tunnel.
    #[must_use]
    pub fn is_proxy_rejected(&self) -> bool {
        matches!(self.inner.kind, Kind::ProxyRejected { .. })
    }

    /// Returns true if the error is related to the dial context's deadline.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if err.is::<TimedOut>() {
                return true;
            }
            if let Some(io) = err.downcast_ref::<io::Error>() {
                if io.kind() == io::ErrorKind::TimedOut {
                    return true;
                }
            }
            source = err.source();
        }

        false
    }

    /// Returns true if the dial context was canceled.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if err.is::<OperationCanceled>() {
                return true;
            }
            source = err.source();
        }

        false
    }

    /// Returns the proxy's status code, if the proxy rejected the tunnel.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self.inner.kind {
            Kind::ProxyRejected { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Returns the dumped proxy response, if the proxy rejected the tunnel and the
    /// response could be captured.
    #[must_use]
    pub fn response_dump(&self) -> Option<&str> {
        match &self.inner.kind {
            Kind::ProxyRejected { dump, .. } => dump.as_deref(),
            _ => None,
        }
    }
}
