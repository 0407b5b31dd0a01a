use std::error::Error as StdError;
use std::io;

use super::types::{Error, Kind};

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        let kind = if error.is_timeout() {
            io::ErrorKind::TimedOut
        } else if error.is_canceled() {
            io::ErrorKind::Interrupted
        } else if let Some(io) = error.source().and_then(|e| e.downcast_ref::<io::Error>()) {
            io.kind()
        } else {
            match error.kind() {
                Kind::Resolution => io::ErrorKind::InvalidInput,
                Kind::Dial => io::ErrorKind::NotConnected,
                Kind::HandshakeWrite | Kind::HandshakeRead => io::ErrorKind::ConnectionAborted,
                Kind::ProxyRejected { .. } => io::ErrorKind::PermissionDenied,
            }
        };

        io::Error::new(kind, error)
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;
    use crate::error::{dial, proxy_rejected, TimedOut};

    #[test]
    fn timeout_maps_to_timed_out() {
        let err: io::Error = dial(TimedOut).into();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn io_source_kind_is_preserved() {
        let err: io::Error = dial(io::Error::from(io::ErrorKind::ConnectionRefused)).into();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
    }

    #[test]
    fn rejection_maps_to_permission_denied() {
        let err: io::Error = proxy_rejected(StatusCode::FORBIDDEN, None, None).into();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(err.to_string().contains("403"));
    }
}
