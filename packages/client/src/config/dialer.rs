//! Core dialer configuration structure and defaults

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Client identification sent in the `User-Agent` header of every CONNECT request.
pub const DEFAULT_USER_AGENT: &str = concat!("tunneldial/", env!("CARGO_PKG_VERSION"));

/// Dialer configuration
///
/// Holds no proxy selection; that is read from the environment on every dial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialerConfig {
    /// `User-Agent` header value for CONNECT requests
    pub user_agent: String,

    /// Capacity of the buffered reader used to parse the CONNECT response
    pub read_buffer_size: usize,

    /// Maximum number of headers accepted in the CONNECT response
    pub max_response_headers: usize,

    /// Maximum number of body bytes captured when dumping a rejected response
    pub max_error_body: usize,

    /// Time allowed for reading a rejected response's body before the dump
    /// falls back to the status line
    #[serde(with = "millis")]
    pub error_body_timeout: Duration,

    /// Enable TCP_NODELAY on dialed sockets
    pub tcp_nodelay: bool,

    /// Enable TCP keepalive with operating system default timings
    pub tcp_keepalive: bool,

    /// Upper bound for the TCP connect stage, applied on top of the dial context
    #[serde(with = "optional_millis")]
    pub connect_timeout: Option<Duration>,
}

impl Default for DialerConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            read_buffer_size: 4 * 1024,
            max_response_headers: 64,
            max_error_body: 64 * 1024,
            error_body_timeout: Duration::from_secs(2),
            tcp_nodelay: true,
            tcp_keepalive: true,
            connect_timeout: None,
        }
    }
}

impl DialerConfig {
    /// Set the `User-Agent` sent to proxies.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the handshake read buffer capacity.
    #[must_use]
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Set the cap for the connect stage.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Enable or disable TCP_NODELAY.
    #[must_use]
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }

    /// Enable or disable TCP keepalive.
    #[must_use]
    pub fn tcp_keepalive(mut self, enabled: bool) -> Self {
        self.tcp_keepalive = enabled;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

mod optional_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
