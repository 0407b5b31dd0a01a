use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;

/// A Result alias where the Err case is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failed dial attempt.
///
/// Every variant is terminal for the attempt that produced it. The socket, if one
/// was opened, has already been closed by the time the caller sees this value.
pub struct Error {
    pub inner: Box<Inner>,
}

pub struct Inner {
    pub kind: Kind,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Target address or proxy configuration could not be turned into an endpoint
    Resolution,
    /// TCP connection to the target or the proxy could not be established
    Dial,
    /// The CONNECT request could not be written to the proxy
    HandshakeWrite,
    /// The proxy's response to CONNECT could not be read or parsed
    HandshakeRead,
    /// The proxy answered CONNECT with a non-success status
    ProxyRejected {
        status: StatusCode,
        reason: Option<String>,
        dump: Option<String>,
    },
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                target: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.inner.target = Some(target.into());
        self
    }

    /// The kind of failure.
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// The target address the failed dial was aimed at, if known.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.inner.target.as_deref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("tunneldial::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref target) = self.inner.target {
            f.field("target", target);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Resolution => f.write_str("failed to resolve proxy for target")?,
            Kind::Dial => f.write_str("failed to dial")?,
            Kind::HandshakeWrite => f.write_str("failed to write the HTTP CONNECT request")?,
            Kind::HandshakeRead => f.write_str("reading proxy HTTP response")?,
            Kind::ProxyRejected {
                status,
                reason,
                dump,
            } => {
                // The dump already carries the status line; fall back to it when absent.
                match dump {
                    Some(dump) => write!(f, "failed to do connect handshake, response: {dump:?}")?,
                    None => match reason {
                        Some(reason) => write!(
                            f,
                            "failed to do connect handshake, status code: {} {reason}",
                            status.as_u16()
                        )?,
                        None => write!(
                            f,
                            "failed to do connect handshake, status code: {}",
                            status.as_u16()
                        )?,
                    },
                }
            }
        }

        if let Some(ref target) = self.inner.target {
            write!(f, " ({target})")?;
        }

        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
