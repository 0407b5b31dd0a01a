//! Core proxy types
//!
//! Target addresses, resolved proxy endpoints, the per-call configuration
//! snapshot and no-proxy exclusion rules.

pub mod endpoint;
pub mod no_proxy;
pub mod target;
pub mod types;

pub use types::{Credentials, NoProxy, ProxyConfig, ProxyEndpoint, TargetAddr};
