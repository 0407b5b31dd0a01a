//! Per-call proxy resolution

use std::sync::Arc;

use thiserror::Error;

use super::core::{NoProxy, ProxyConfig, ProxyEndpoint, TargetAddr};
use super::env::{ProxyEnv, SystemProxyEnv};

/// Why a target address or proxy value could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid target address {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("invalid proxy URL: {reason}")]
    InvalidProxyUrl { reason: String },

    #[error("unsupported proxy scheme {scheme:?}")]
    UnsupportedScheme { scheme: String },
}

impl ProxyConfig {
    /// Variables consulted for the proxy of an `https` target, in priority order.
    pub const HTTPS_PROXY_VARS: &'static [&'static str] = &["HTTPS_PROXY", "https_proxy"];
    /// Variables holding the exclusion list.
    pub const NO_PROXY_VARS: &'static [&'static str] = &["NO_PROXY", "no_proxy"];

    /// Take a snapshot of the proxy variables in `env`.
    pub fn from_env(env: &(impl ProxyEnv + ?Sized)) -> Self {
        ProxyConfig {
            https_proxy: env.var_any(Self::HTTPS_PROXY_VARS),
            no_proxy: env
                .var_any(Self::NO_PROXY_VARS)
                .map(|raw| NoProxy::from_string(&raw))
                .unwrap_or_default(),
        }
    }

    /// Proxy for `target`, treating it as an `https` destination.
    ///
    /// A proxy value that does not parse, or names a scheme other than
    /// `http`/`https`, is treated as unset and the target is dialed directly.
    #[must_use]
    pub fn proxy_for(&self, target: &TargetAddr) -> Option<ProxyEndpoint> {
        let raw = self.https_proxy.as_deref()?;

        if !self.no_proxy.use_proxy(target) {
            return None;
        }

        match ProxyEndpoint::parse(raw) {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                // `e` never echoes the raw value, which may hold credentials.
                tracing::warn!(
                    target: "tunneldial::proxy",
                    %target,
                    error = %e,
                    "ignoring unusable HTTPS_PROXY value"
                );
                None
            }
        }
    }
}

/// Resolves the proxy endpoint for a dial target.
///
/// Holds only the source of configuration; every [`ProxyResolver::resolve`]
/// call takes a fresh [`ProxyConfig`] snapshot.
#[derive(Clone)]
pub struct ProxyResolver {
    env: Arc<dyn ProxyEnv>,
}

impl ProxyResolver {
    /// Resolver backed by `env`.
    pub fn new(env: impl ProxyEnv + 'static) -> Self {
        Self { env: Arc::new(env) }
    }

    /// Resolver backed by the live process environment.
    #[must_use]
    pub fn system() -> Self {
        Self::new(SystemProxyEnv)
    }

    /// Parse `target` and decide whether, and through which proxy, to reach it.
    ///
    /// # Errors
    ///
    /// Returns a resolution error when `target` is malformed. The proxy
    /// variables themselves never cause a failure.
    pub fn resolve(&self, target: &str) -> crate::Result<Option<ProxyEndpoint>> {
        let target_addr = TargetAddr::parse(target)
            .map_err(|e| crate::error::resolution(e).with_target(target))?;
        Ok(self.resolve_addr(&target_addr))
    }

    /// [`ProxyResolver::resolve`] for an already parsed target.
    #[must_use]
    pub fn resolve_addr(&self, target: &TargetAddr) -> Option<ProxyEndpoint> {
        let config = ProxyConfig::from_env(&*self.env);
        let endpoint = config.proxy_for(target);

        match &endpoint {
            Some(proxy) => tracing::debug!(
                target: "tunneldial::proxy",
                %target,
                %proxy,
                "resolved proxy for target"
            ),
            None => tracing::trace!(
                target: "tunneldial::proxy",
                %target,
                "no proxy applies to target"
            ),
        }

        endpoint
    }
}

impl Default for ProxyResolver {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for ProxyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyResolver").finish_non_exhaustive()
    }
}
