//! Dial target parsing

use std::str::FromStr;

use url::Url;

use super::types::TargetAddr;
use crate::proxy::resolver::ResolveError;

/// Port assumed for targets given without one; targets are resolved as `https`.
pub const DEFAULT_TARGET_PORT: u16 = 443;

impl TargetAddr {
    /// Parse a `host[:port]` dial target.
    ///
    /// The target is read as the authority of an `https` URL, so hostnames are
    /// lowercased and IDNA-encoded, IPv6 literals must be bracketed and a
    /// missing port means 443.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidTarget`] when the input is not a bare
    /// authority with a non-empty host.
    pub fn parse(target: &str) -> Result<Self, ResolveError> {
        let invalid = |reason: &str| ResolveError::InvalidTarget {
            target: target.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = target.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty address"));
        }
        if trimmed.contains(['/', '?', '#', '@']) || trimmed.contains(char::is_whitespace) {
            return Err(invalid("expected host:port"));
        }

        let url = Url::parse(&format!("https://{trimmed}")).map_err(|e| invalid(&e.to_string()))?;
        let host = url
            .host()
            .ok_or_else(|| invalid("missing host"))?
            .to_owned();
        let port = url.port_or_known_default().unwrap_or(DEFAULT_TARGET_PORT);

        Ok(TargetAddr { host, port })
    }
}

impl FromStr for TargetAddr {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetAddr::parse(s)
    }
}
