//! # tunneldial client
//!
//! Proxy-aware TCP dialing for RPC transports.
//!
//! Each dial reads `HTTPS_PROXY` / `NO_PROXY` from the environment, then
//! either connects straight to the target or opens an HTTP CONNECT tunnel
//! through the selected proxy. Nothing about the proxy decision is cached,
//! so changing the environment between two dials changes how the second one
//! connects.
//!
//! ## Features
//!
//! - **Per-dial proxy resolution** with `NO_PROXY` domain, IP and CIDR rules
//! - **HTTP CONNECT tunneling** with optional Basic proxy authentication
//! - **Read-ahead preservation**: bytes the proxy sends right after its
//!   response head are returned by the first reads on the connection
//! - **Cancellation and deadlines** applied to each stage of the dial
//! - **`tower::Service<Uri>`** implementation for use as a connector
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tunneldial_client::{DialContext, TunnelDialer};
//! use std::time::Duration;
//!
//! # async fn run() -> tunneldial_client::Result<()> {
//! let ctx = DialContext::background().with_timeout(Duration::from_secs(5));
//! let conn = TunnelDialer::new().dial(&ctx, "api.example.com:443").await?;
//! println!("connected to {:?}", conn.peer_addr());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

use std::sync::OnceLock;

pub mod config;
pub mod connect;
pub mod error;
pub mod proxy;

// Prelude with canonical types
pub mod prelude;

pub use crate::prelude::*;

/// Shared dialer used by [`dynamic_proxy_dialer`].
///
/// It holds only the default configuration and a handle to the process
/// environment, so sharing it across tasks does not share proxy decisions.
static GLOBAL_DIALER: OnceLock<TunnelDialer> = OnceLock::new();

/// Get the global dialer instance.
pub fn global_dialer() -> &'static TunnelDialer {
    GLOBAL_DIALER.get_or_init(TunnelDialer::new)
}
