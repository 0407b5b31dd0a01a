//! Core `DialerBuilder` structure and construction

use std::fmt;
use std::sync::Arc;

use tunneldial_client::config::{ConfigResult, ConfigurationError, Validator};
use tunneldial_client::proxy::{ProxyEnv, ProxyResolver, SystemProxyEnv};
use tunneldial_client::{DialerConfig, TunnelDialer};

/// Builder for [`TunnelDialer`].
///
/// Starts from the default configuration and the process environment.
#[derive(Clone)]
pub struct DialerBuilder {
    pub(crate) config: DialerConfig,
    pub(crate) env: Arc<dyn ProxyEnv>,
}

impl DialerBuilder {
    /// Create a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DialerConfig::default(),
            env: Arc::new(SystemProxyEnv),
        }
    }

    /// Create a builder from a JSON-encoded [`DialerConfig`].
    ///
    /// Missing fields take their defaults; durations are in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when the JSON does not describe a configuration.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: DialerConfig = serde_json::from_str(json)
            .map_err(|e| ConfigurationError::InvalidParameter(e.to_string()))?;
        Ok(Self::new().config(config))
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: DialerConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration the dialer will be built with.
    #[must_use]
    pub fn current_config(&self) -> &DialerConfig {
        &self.config
    }

    /// Validate the configuration and build the dialer.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn build(self) -> ConfigResult<TunnelDialer> {
        if let Err(e) = self.config.validate() {
            log::warn!("rejecting dialer configuration: {e}");
            return Err(e);
        }

        log::debug!(
            "building dialer (user agent {:?}, read buffer {} bytes, connect timeout {:?})",
            self.config.user_agent,
            self.config.read_buffer_size,
            self.config.connect_timeout
        );

        Ok(TunnelDialer::with_resolver(
            ProxyResolver::new(self.env),
            self.config,
        ))
    }
}

impl Default for DialerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DialerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialerBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
