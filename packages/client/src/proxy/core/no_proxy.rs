//! NoProxy parsing and matching
//!
//! Handles no-proxy configuration strings with the matching rules commonly
//! shared by command line tools and HTTP clients.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::Host;

use super::types::{NoProxy, NoProxyEntry, TargetAddr};

impl NoProxy {
    /// Parse a `no_proxy` string.
    ///
    /// The rules are as follows:
    /// * Entries are comma-separated; surrounding whitespace is ignored and
    ///   matching is case-insensitive.
    /// * An entry "`*`" matches every target.
    /// * IP addresses (both IPv4 and IPv6) are allowed, optionally with a port
    ///   (`1.2.3.4:80`, `[::1]:80`), as are CIDR prefixes (`192.168.1.0/24`).
    /// * Any other entry is a domain name, optionally with a port. `foo.com`
    ///   matches `foo.com` and all of its subdomains, while `.foo.com` and
    ///   `*.foo.com` match subdomains only.
    /// * Entries that cannot be parsed are ignored.
    ///
    /// For example, with `"google.com, 192.168.1.0/24"` the targets
    /// `google.com:443`, `www.google.com:443` and `192.168.1.42:443` bypass the
    /// proxy, while `notgoogle.com:443` does not.
    #[must_use]
    pub fn from_string(no_proxy_list: &str) -> Self {
        let mut entries = Vec::new();

        for raw in no_proxy_list.split(',') {
            let pattern = raw.trim().to_ascii_lowercase();
            if pattern.is_empty() {
                continue;
            }

            if pattern == "*" {
                return NoProxy {
                    entries: vec![NoProxyEntry::All],
                };
            }

            if let Some((network, prefix_len)) = parse_cidr_pattern(&pattern) {
                entries.push(NoProxyEntry::Cidr {
                    network,
                    prefix_len,
                });
                continue;
            }

            let Some((host, port)) = split_host_port(&pattern) else {
                continue;
            };

            if let Ok(ip) = host.parse::<IpAddr>() {
                entries.push(NoProxyEntry::Ip { ip, port });
                continue;
            }

            // "*.foo.com" is the same as ".foo.com"
            let domain = host
                .strip_prefix('*')
                .filter(|rest| rest.starts_with('.'))
                .unwrap_or(host);

            let match_host = !domain.starts_with('.');
            let bare = domain.trim_start_matches('.');
            if bare.is_empty() {
                continue;
            }

            // Targets are IDNA-encoded by the URL parser; encode entries the same way.
            let bare = match Host::parse(bare) {
                Ok(Host::Domain(ascii)) => ascii,
                _ => bare.to_string(),
            };

            entries.push(NoProxyEntry::Domain {
                suffix: format!(".{bare}"),
                match_host,
                port,
            });
        }

        NoProxy { entries }
    }

    /// Returns true when no entries were configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a target should bypass the proxy based on no-proxy rules.
    #[must_use]
    pub fn matches(&self, target: &TargetAddr) -> bool {
        let port = target.port();
        let ip = target.ip();
        let host = target.host().to_string();

        self.entries.iter().any(|entry| match entry {
            NoProxyEntry::All => true,
            NoProxyEntry::Cidr {
                network,
                prefix_len,
            } => ip.is_some_and(|ip| ip_in_subnet(ip, *network, *prefix_len)),
            NoProxyEntry::Ip {
                ip: entry_ip,
                port: entry_port,
            } => ip == Some(*entry_ip) && port_matches(*entry_port, port),
            NoProxyEntry::Domain {
                suffix,
                match_host,
                port: entry_port,
            } => {
                let hit = host.ends_with(suffix.as_str())
                    || (*match_host && host == suffix[1..]);
                hit && port_matches(*entry_port, port)
            }
        })
    }

    /// Full proxy decision: false for loopback targets and targets excluded
    /// by these rules.
    #[must_use]
    pub fn use_proxy(&self, target: &TargetAddr) -> bool {
        match target.host() {
            Host::Domain(name) if name == "localhost" => return false,
            _ => {}
        }
        if target.ip().is_some_and(|ip| ip.is_loopback()) {
            return false;
        }

        !self.matches(target)
    }
}

fn port_matches(entry_port: Option<u16>, port: u16) -> bool {
    entry_port.is_none_or(|p| p == port)
}

/// Split an entry into host and optional port, stripping IPv6 brackets.
/// Returns `None` for malformed entries (empty host, bad port).
fn split_host_port(pattern: &str) -> Option<(&str, Option<u16>)> {
    if let Some(rest) = pattern.strip_prefix('[') {
        let (host, after) = rest.split_once(']')?;
        let port = match after {
            "" => None,
            _ => Some(after.strip_prefix(':')?.parse().ok()?),
        };
        return (!host.is_empty()).then_some((host, port));
    }

    match pattern.matches(':').count() {
        0 => Some((pattern, None)),
        1 => {
            let (host, port) = pattern.split_once(':')?;
            if host.is_empty() {
                return None;
            }
            Some((host, Some(port.parse().ok()?)))
        }
        // Bare IPv6 literal without brackets.
        _ => Some((pattern, None)),
    }
}

/// Parse a CIDR pattern (e.g., "192.168.1.0/24" or "2001:db8::/32")
/// Returns Some((network_address, prefix_length)) if valid CIDR notation, None otherwise
fn parse_cidr_pattern(pattern: &str) -> Option<(IpAddr, u8)> {
    let (network_str, prefix_str) = pattern.split_once('/')?;

    let network_addr = network_str.parse::<IpAddr>().ok()?;
    let prefix_len = prefix_str.parse::<u8>().ok()?;

    let max_prefix = match network_addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    };

    (prefix_len <= max_prefix).then_some((network_addr, prefix_len))
}

/// Check if an IP address is within a subnet
fn ip_in_subnet(ip: IpAddr, network: IpAddr, prefix_len: u8) -> bool {
    match (ip, network) {
        (IpAddr::V4(ip_v4), IpAddr::V4(net_v4)) => ipv4_in_subnet(ip_v4, net_v4, prefix_len),
        (IpAddr::V6(ip_v6), IpAddr::V6(net_v6)) => ipv6_in_subnet(ip_v6, net_v6, prefix_len),
        _ => false,
    }
}

fn ipv4_in_subnet(ip: Ipv4Addr, network: Ipv4Addr, prefix_len: u8) -> bool {
    if prefix_len == 0 {
        return true;
    }
    let mask = u32::MAX << (32 - u32::from(prefix_len.min(32)));
    (u32::from(ip) & mask) == (u32::from(network) & mask)
}

fn ipv6_in_subnet(ip: Ipv6Addr, network: Ipv6Addr, prefix_len: u8) -> bool {
    if prefix_len == 0 {
        return true;
    }
    let mask = u128::MAX << (128 - u32::from(prefix_len.min(128)));
    (u128::from(ip) & mask) == (u128::from(network) & mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(s: &str) -> TargetAddr {
        TargetAddr::parse(s).expect("test target should parse")
    }

    #[test]
    fn domain_matches_itself_and_subdomains() {
        let no_proxy = NoProxy::from_string("google.com, 192.168.1.0/24");
        assert!(no_proxy.matches(&target("google.com:443")));
        assert!(no_proxy.matches(&target("www.google.com:443")));
        assert!(no_proxy.matches(&target("192.168.1.42:443")));
        assert!(!no_proxy.matches(&target("notgoogle.com:443")));
        assert!(!no_proxy.matches(&target("192.168.2.1:443")));
    }

    #[test]
    fn leading_dot_and_wildcard_match_subdomains_only() {
        for list in [".y.com", "*.y.com"] {
            let no_proxy = NoProxy::from_string(list);
            assert!(no_proxy.matches(&target("x.y.com:443")), "{list}");
            assert!(!no_proxy.matches(&target("y.com:443")), "{list}");
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let no_proxy = NoProxy::from_string("  Internal.CORP  ");
        assert!(no_proxy.matches(&target("svc.internal.corp:50051")));
        assert!(no_proxy.matches(&target("SVC.Internal.Corp:50051")));
    }

    #[test]
    fn ports_restrict_entries() {
        let no_proxy = NoProxy::from_string("foo.com:80, 10.0.0.1:8080, [2001:db8::1]:9000");
        assert!(no_proxy.matches(&target("foo.com:80")));
        assert!(!no_proxy.matches(&target("foo.com:443")));
        assert!(no_proxy.matches(&target("10.0.0.1:8080")));
        assert!(!no_proxy.matches(&target("10.0.0.1:443")));
        assert!(no_proxy.matches(&target("[2001:db8::1]:9000")));
        assert!(!no_proxy.matches(&target("[2001:db8::1]:9001")));
    }

    #[test]
    fn ipv6_literals_and_prefixes() {
        let no_proxy = NoProxy::from_string("2001:db8::1, fd00::/8");
        assert!(no_proxy.matches(&target("[2001:db8::1]:443")));
        assert!(no_proxy.matches(&target("[fd12::5]:443")));
        assert!(!no_proxy.matches(&target("[2001:db8::2]:443")));
    }

    #[test]
    fn star_matches_everything() {
        let no_proxy = NoProxy::from_string("example.com, *");
        assert!(no_proxy.matches(&target("anything.test:1")));
    }

    #[test]
    fn invalid_entries_are_ignored() {
        let no_proxy = NoProxy::from_string(",, :80, foo.com:bad, [::1, ., example.org");
        assert_eq!(no_proxy.entries.len(), 1);
        assert!(no_proxy.matches(&target("example.org:443")));
    }

    #[test]
    fn loopback_is_never_proxied() {
        let no_proxy = NoProxy::default();
        assert!(!no_proxy.use_proxy(&target("localhost:50051")));
        assert!(!no_proxy.use_proxy(&target("127.0.0.1:50051")));
        assert!(!no_proxy.use_proxy(&target("[::1]:50051")));
        assert!(no_proxy.use_proxy(&target("example.com:443")));
    }

    #[test]
    fn subnet_math() {
        assert!(ipv4_in_subnet(
            Ipv4Addr::new(10, 1, 2, 3),
            Ipv4Addr::new(10, 0, 0, 0),
            8
        ));
        assert!(!ipv4_in_subnet(
            Ipv4Addr::new(11, 1, 2, 3),
            Ipv4Addr::new(10, 0, 0, 0),
            8
        ));
        assert!(ipv4_in_subnet(
            Ipv4Addr::new(1, 2, 3, 4),
            Ipv4Addr::UNSPECIFIED,
            0
        ));
        assert!(ipv6_in_subnet(
            "2001:db8::ff".parse().expect("v6"),
            "2001:db8::".parse().expect("v6"),
            32
        ));
    }
}
