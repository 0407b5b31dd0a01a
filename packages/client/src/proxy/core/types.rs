//! Core proxy types and structures

use std::fmt;
use std::net::IpAddr;

use url::Host;

/// A parsed `host:port` dial target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetAddr {
    pub(crate) host: Host<String>,
    pub(crate) port: u16,
}

/// Resolved proxy endpoint for a single dial.
///
/// Only ever produced by a resolver call and never reused across dials.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub(crate) scheme: String,
    pub(crate) host: Host<String>,
    pub(crate) port: u16,
    pub(crate) credentials: Option<Credentials>,
}

/// Username and password embedded in a proxy URL, percent-decoded.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

/// A configuration for filtering out targets that shouldn't be proxied
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoProxy {
    pub(crate) entries: Vec<NoProxyEntry>,
}

/// A single parsed `no_proxy` entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NoProxyEntry {
    /// `*`
    All,
    /// `10.0.0.0/8`, `fd00::/8`
    Cidr { network: IpAddr, prefix_len: u8 },
    /// `1.2.3.4`, `1.2.3.4:80`, `[::1]:80`
    Ip { ip: IpAddr, port: Option<u16> },
    /// `foo.com`, `.foo.com`, `*.foo.com`, each with an optional port.
    /// `suffix` always starts with a dot.
    Domain {
        suffix: String,
        match_host: bool,
        port: Option<u16>,
    },
}

/// Snapshot of proxy-related environment variables for one resolution.
///
/// `HTTP_PROXY` is not read: targets are always resolved as `https`.
#[derive(Clone, Debug, Default)]
pub struct ProxyConfig {
    /// `HTTPS_PROXY` / `https_proxy`
    pub https_proxy: Option<String>,
    /// `NO_PROXY` / `no_proxy`
    pub no_proxy: NoProxy,
}

impl TargetAddr {
    /// Host part, without IPv6 brackets.
    #[must_use]
    pub fn host(&self) -> &Host<String> {
        &self.host
    }

    /// Port, defaulted to 443 when the input had none.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// IP address of the host, when the host is an IP literal.
    #[must_use]
    pub fn ip(&self) -> Option<IpAddr> {
        match self.host {
            Host::Ipv4(ip) => Some(IpAddr::V4(ip)),
            Host::Ipv6(ip) => Some(IpAddr::V6(ip)),
            Host::Domain(_) => None,
        }
    }

    /// `host:port`, with brackets around IPv6 hosts.
    #[must_use]
    pub fn authority(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TargetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Host's Display already brackets IPv6.
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl ProxyEndpoint {
    /// Proxy URL scheme (`http` or `https`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Proxy host.
    #[must_use]
    pub fn host(&self) -> &Host<String> {
        &self.host
    }

    /// Proxy port, defaulted from the scheme when the URL had none.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` to open the TCP connection to.
    #[must_use]
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Embedded credentials, if any.
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// `Proxy-Authorization` header value for the embedded credentials.
    #[must_use]
    pub fn basic_auth(&self) -> Option<String> {
        self.credentials.as_ref().map(Credentials::basic_auth)
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl fmt::Debug for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyEndpoint")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl Credentials {
    /// Create credentials from already-decoded parts.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// `Basic <base64(user:pass)>`
    #[must_use]
    pub fn basic_auth(&self) -> String {
        use base64::Engine;
        let credentials = format!("{}:{}", self.username, self.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
