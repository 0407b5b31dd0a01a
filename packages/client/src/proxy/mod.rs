//! Proxy resolution
//!
//! Decides, for every dial, whether a target is reached through an HTTP
//! forwarding proxy and which one. Configuration is read from a [`ProxyEnv`]
//! on each call and never cached, so changes to `HTTPS_PROXY` / `NO_PROXY`
//! between dials take effect immediately.

pub mod core;
pub mod env;
pub mod resolver;

pub use core::{Credentials, NoProxy, ProxyConfig, ProxyEndpoint, TargetAddr};
pub use env::{ProxyEnv, StaticProxyEnv, SystemProxyEnv};
pub use resolver::{ProxyResolver, ResolveError};

/// Resolve the proxy for `target` against the live process environment.
///
/// # Errors
///
/// Returns a resolution error when `target` is not a valid `host[:port]`.
pub fn resolve(target: &str) -> crate::Result<Option<ProxyEndpoint>> {
    ProxyResolver::system().resolve(target)
}
