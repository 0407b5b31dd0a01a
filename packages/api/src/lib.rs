//! tunneldial public API
//!
//! Proxy-aware TCP dialing for RPC transports. Every dial reads
//! `HTTPS_PROXY` / `NO_PROXY` at call time and either connects directly or
//! tunnels through the proxy with HTTP CONNECT.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tunneldial::{Dialer, DialContext};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let dialer = Dialer::builder()
//!     .user_agent("my-service/1.0")
//!     .connect_timeout(Duration::from_secs(3))
//!     .build()?;
//!
//! let ctx = DialContext::background().with_timeout(Duration::from_secs(10));
//! let conn = dialer.dial(&ctx, "api.example.com:443").await?;
//! # drop(conn);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;

pub use builder::DialerBuilder;

// Re-export important types from client package
pub use tunneldial_client::config::{ConfigurationError, DialerConfig, DEFAULT_USER_AGENT};
pub use tunneldial_client::error::{Error, Kind, Result};
pub use tunneldial_client::proxy::{
    ProxyEndpoint, ProxyEnv, ProxyResolver, StaticProxyEnv, SystemProxyEnv, TargetAddr,
};
pub use tunneldial_client::{
    BufferedConnection, CancellationToken, DialContext, TunnelConnection, TunnelDialer,
};

/// Main entry point providing static constructors
pub struct Dialer;

impl Dialer {
    /// Create a new [`DialerBuilder`].
    #[must_use]
    pub fn builder() -> DialerBuilder {
        DialerBuilder::new()
    }

    /// Dialer with default settings reading the process environment.
    #[must_use]
    pub fn system() -> TunnelDialer {
        TunnelDialer::new()
    }
}

/// Dial `addr`, resolving the proxy from the process environment at call time.
///
/// # Errors
///
/// Fails with a resolution, dial, handshake or rejection error; see [`Kind`].
pub async fn dynamic_proxy_dialer(ctx: &DialContext, addr: &str) -> Result<TunnelConnection> {
    log::trace!("dialing {addr}");
    tunneldial_client::dynamic_proxy_dialer(ctx, addr).await
}
