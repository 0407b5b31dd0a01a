//! Core dialer structure and the dial entry point

use std::sync::Arc;

use crate::config::{DialerConfig, Validator};
use crate::connect::context::DialContext;
use crate::connect::types::TunnelConnection;
use crate::error;
use crate::proxy::{ProxyEnv, ProxyResolver, TargetAddr};

/// Proxy-aware TCP dialer.
///
/// Holds no proxy state of its own: every [`TunnelDialer::dial`] consults the
/// environment afresh, then either connects straight to the target or opens
/// an HTTP CONNECT tunnel through the selected proxy.
#[derive(Clone, Debug)]
pub struct TunnelDialer {
    pub(super) resolver: ProxyResolver,
    pub(super) config: Arc<DialerConfig>,
}

impl TunnelDialer {
    /// Dialer reading proxy settings from the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(ProxyResolver::system(), DialerConfig::default())
    }

    /// Dialer reading proxy settings from `env`.
    #[must_use]
    pub fn with_env(env: impl ProxyEnv + 'static) -> Self {
        Self::with_resolver(ProxyResolver::new(env), DialerConfig::default())
    }

    /// Dialer from its parts. The configuration is used as given; call
    /// [`Validator::validate`] first if it comes from an untrusted source.
    #[must_use]
    pub fn with_resolver(resolver: ProxyResolver, config: DialerConfig) -> Self {
        Self {
            resolver,
            config: Arc::new(config),
        }
    }

    /// Dialer from its parts, rejecting an invalid configuration.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found.
    pub fn try_with_config(
        resolver: ProxyResolver,
        config: DialerConfig,
    ) -> crate::config::ConfigResult<Self> {
        config.validate()?;
        Ok(Self::with_resolver(resolver, config))
    }

    /// Replace the configuration.
    #[must_use]
    pub fn config(mut self, config: DialerConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn dialer_config(&self) -> &DialerConfig {
        &self.config
    }

    /// The resolver consulted on each dial.
    #[must_use]
    pub fn resolver(&self) -> &ProxyResolver {
        &self.resolver
    }

    /// Dial `addr` (`host[:port]`, port 443 when omitted).
    ///
    /// Resolution happens before any I/O; a resolution failure opens no
    /// socket. `ctx` bounds the connect, the CONNECT write and the CONNECT
    /// read independently, and the socket is closed on every failure.
    ///
    /// # Errors
    ///
    /// See [`crate::error::Kind`] for the failure classes.
    pub async fn dial(&self, ctx: &DialContext, addr: &str) -> crate::Result<TunnelConnection> {
        let target =
            TargetAddr::parse(addr).map_err(|e| error::resolution(e).with_target(addr))?;
        self.dial_addr(ctx, &target).await
    }

    /// [`TunnelDialer::dial`] for an already parsed target.
    ///
    /// # Errors
    ///
    /// See [`TunnelDialer::dial`].
    pub async fn dial_addr(
        &self,
        ctx: &DialContext,
        target: &TargetAddr,
    ) -> crate::Result<TunnelConnection> {
        match self.resolver.resolve_addr(target) {
            None => self.connect_direct(ctx, target).await,
            Some(proxy) => self.connect_via_proxy(ctx, target, &proxy).await,
        }
    }
}

impl Default for TunnelDialer {
    fn default() -> Self {
        Self::new()
    }
}

/// Dial `addr` with the default configuration, resolving the proxy from the
/// process environment at call time.
///
/// # Errors
///
/// See [`TunnelDialer::dial`].
pub async fn dynamic_proxy_dialer(
    ctx: &DialContext,
    addr: &str,
) -> crate::Result<TunnelConnection> {
    crate::global_dialer().dial(ctx, addr).await
}
