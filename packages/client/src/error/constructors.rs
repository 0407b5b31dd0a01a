use http::StatusCode;

use super::types::{Error, Kind};
use super::BoxError;

/// Creates an `Error` for a target or proxy URL that could not be resolved.
pub fn resolution<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Resolution).with(e.into())
}

/// Creates an `Error` for a TCP connect failure.
pub fn dial<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Dial).with(e.into())
}

/// Creates an `Error` for a failed CONNECT request write.
pub fn handshake_write<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::HandshakeWrite).with(e.into())
}

/// Creates an `Error` for an unreadable CONNECT response.
pub fn handshake_read<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::HandshakeRead).with(e.into())
}

/// Creates an `Error` for a proxy that refused the tunnel.
///
/// `dump` is the best-effort text of the whole response; pass `None` when it
/// could not be produced so that only the status is reported.
pub fn proxy_rejected(status: StatusCode, reason: Option<String>, dump: Option<String>) -> Error {
    Error::new(Kind::ProxyRejected {
        status,
        reason,
        dump,
    })
}
