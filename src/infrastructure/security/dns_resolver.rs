//! Public-link resolution through the system resolver.

use async_trait::async_trait;
use url::{Host, Url};

use crate::domain::security::{GateError, LinkResolver, Reachability};
use crate::utils::ip_ranges::is_private_ip;

/// Classifies a link by where its host actually resolves.
///
/// Catches hostnames that are not IP literals but still point into private
/// ranges. Any private address among the results makes the link private.
#[derive(Debug, Default, Clone, Copy)]
pub struct DnsLinkResolver;

impl DnsLinkResolver {
    pub fn new() -> Self {
        Self
    }
}

fn is_localhost_name(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    domain == "localhost" || domain.ends_with(".localhost")
}

#[async_trait]
impl LinkResolver for DnsLinkResolver {
    async fn classify(&self, url: &Url) -> Result<Reachability, GateError> {
        let domain = match url.host() {
            Some(Host::Ipv4(ip)) => return Ok(classify_ip(&ip.into())),
            Some(Host::Ipv6(ip)) => return Ok(classify_ip(&ip.into())),
            Some(Host::Domain(domain)) => domain,
            None => return Err(GateError::Lookup("link has no host".into())),
        };

        if is_localhost_name(domain) {
            return Ok(Reachability::Private);
        }

        let port = url.port_or_known_default().unwrap_or(443);
        let addrs: Vec<_> = tokio::net::lookup_host((domain, port))
            .await
            .map_err(|e| GateError::Lookup(format!("{domain}: {e}")))?
            .collect();

        if addrs.is_empty() {
            return Err(GateError::Lookup(format!("{domain}: no addresses")));
        }

        if addrs.iter().any(|addr| is_private_ip(&addr.ip())) {
            tracing::debug!(host = domain, "host resolves to a private address");
            return Ok(Reachability::Private);
        }

        Ok(Reachability::Public)
    }
}

fn classify_ip(ip: &std::net::IpAddr) -> Reachability {
    if is_private_ip(ip) {
        Reachability::Private
    } else {
        Reachability::Public
    }
}
