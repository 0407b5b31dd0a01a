//! Proxy environment selection

use std::sync::Arc;

use tunneldial_client::proxy::{ProxyEnv, StaticProxyEnv, SystemProxyEnv};

use super::core::DialerBuilder;

impl DialerBuilder {
    /// Read proxy variables from `env` instead of the process environment.
    ///
    /// The source is still consulted on every dial.
    #[must_use]
    pub fn env(mut self, env: impl ProxyEnv + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Read proxy variables from the process environment (the default).
    #[must_use]
    pub fn system_env(self) -> Self {
        self.env(SystemProxyEnv)
    }

    /// Never use a proxy.
    #[must_use]
    pub fn no_proxy(self) -> Self {
        self.env(StaticProxyEnv::new())
    }

    /// Use `proxy_url` for every target not excluded by `no_proxy`.
    ///
    /// Shorthand for a fixed environment with `HTTPS_PROXY` and `NO_PROXY`.
    #[must_use]
    pub fn fixed_proxy(self, proxy_url: impl Into<String>, no_proxy: impl Into<String>) -> Self {
        self.env(
            StaticProxyEnv::new()
                .with("HTTPS_PROXY", proxy_url)
                .with("NO_PROXY", no_proxy),
        )
    }
}
