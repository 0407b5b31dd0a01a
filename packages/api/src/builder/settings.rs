//! Handshake and socket settings

use std::time::Duration;

use super::core::DialerBuilder;

impl DialerBuilder {
    /// `User-Agent` sent with CONNECT requests.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Cap on the TCP connect stage, in addition to the dial context.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Budget for reading the body of a rejected CONNECT response.
    #[must_use]
    pub fn error_body_timeout(mut self, timeout: Duration) -> Self {
        self.config.error_body_timeout = timeout;
        self
    }

    /// Capacity of the CONNECT response buffer.
    #[must_use]
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    /// Most response body bytes kept in a rejection message.
    #[must_use]
    pub fn max_error_body(mut self, size: usize) -> Self {
        self.config.max_error_body = size;
        self
    }

    /// Set `TCP_NODELAY` on dialed sockets.
    #[must_use]
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.config.tcp_nodelay = enabled;
        self
    }

    /// Enable TCP keepalive on dialed sockets.
    #[must_use]
    pub fn tcp_keepalive(mut self, enabled: bool) -> Self {
        self.config.tcp_keepalive = enabled;
        self
    }
}
