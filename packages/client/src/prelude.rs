//! tunneldial prelude
//!
//! The types needed to dial through the environment's proxy settings.

pub use crate::config::{DialerConfig, Validator, DEFAULT_USER_AGENT};
pub use crate::connect::{
    dynamic_proxy_dialer, BufferedConnection, DialContext, TunnelConnection, TunnelDialer,
};
pub use crate::error::{Error, Kind, Result};
pub use crate::proxy::{ProxyEndpoint, ProxyEnv, ProxyResolver, StaticProxyEnv, TargetAddr};

pub use tokio_util::sync::CancellationToken;
