//! Private and reserved IP range classification.
//!
//! Used twice: on literal IP hostnames during schema validation, and on DNS
//! answers by the public-link resolver.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

/// Returns true if the address must not be the target of a public short link.
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_ipv4(v4),
        IpAddr::V6(v6) => is_private_ipv6(v6),
    }
}

/// IPv4 private, loopback, link-local and reserved ranges.
pub fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();

    ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_multicast()
        // 0.0.0.0/8 "this network"
        || a == 0
        // 100.64.0.0/10 carrier-grade NAT
        || (a == 100 && (b & 0b1100_0000) == 0b0100_0000)
        // 192.0.0.0/24 protocol assignments
        || (a == 192 && b == 0 && ip.octets()[2] == 0)
        // 198.18.0.0/15 benchmarking
        || (a == 198 && (b & 0xfe) == 18)
        // 240.0.0.0/4 reserved
        || a >= 240
}

/// IPv6 loopback, unique-local, link-local, documentation and reserved
/// ranges, plus private IPv4 carried inside an IPv6 address.
pub fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_private_ipv4(&mapped);
    }
    if let Some(embedded) = translated_ipv4(ip) {
        return is_private_ipv4(&embedded);
    }

    let segments = ip.segments();

    ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_unique_local()
        || ip.is_unicast_link_local()
        || ip.is_multicast()
        // ::/96 deprecated IPv4-compatible
        || segments[..6].iter().all(|&s| s == 0)
        // fec0::/10 deprecated site-local
        || (segments[0] & 0xffc0) == 0xfec0
        // 2001:db8::/32 documentation
        || (segments[0] == 0x2001 && segments[1] == 0x0db8)
}

/// IPv4 address embedded by NAT64 (`64:ff9b::/96`) or 6to4 (`2002::/16`).
fn translated_ipv4(ip: &Ipv6Addr) -> Option<Ipv4Addr> {
    let join = |hi: u16, lo: u16| {
        let [a, b] = hi.to_be_bytes();
        let [c, d] = lo.to_be_bytes();
        Ipv4Addr::new(a, b, c, d)
    };

    match ip.segments() {
        [0x64, 0xff9b, 0, 0, 0, 0, hi, lo] => Some(join(hi, lo)),
        [0x2002, hi, lo, ..] => Some(join(hi, lo)),
        _ => None,
    }
}

/// Returns the URL host when it is a literal IP address.
pub fn literal_ip(url: &Url) -> Option<IpAddr> {
    match url.host()? {
        Host::Ipv4(v4) => Some(IpAddr::V4(v4)),
        Host::Ipv6(v6) => Some(IpAddr::V6(v6)),
        Host::Domain(_) => None,
    }
}

/// Returns true if the URL host is a literal IP in a private or reserved range.
///
/// Domain names always pass; they are not resolved here.
pub fn has_private_literal_host(url: &Url) -> bool {
    literal_ip(url).is_some_and(|ip| is_private_ip(&ip))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_private_ipv4_ranges() {
        for addr in [
            "10.0.0.1",
            "172.16.5.4",
            "192.168.1.5",
            "127.0.0.1",
            "169.254.10.10",
            "0.0.0.0",
            "0.1.2.3",
            "100.64.0.1",
            "100.127.255.254",
            "198.18.0.1",
            "198.19.255.255",
            "192.0.0.8",
            "192.0.2.1",
            "255.255.255.255",
            "240.0.0.1",
            "224.0.0.1",
        ] {
            assert!(is_private_ip(&ip(addr)), "{addr} should be private");
        }
    }

    #[test]
    fn test_public_ipv4() {
        for addr in ["8.8.8.8", "1.1.1.1", "100.128.0.1", "198.20.0.1", "172.32.0.1"] {
            assert!(!is_private_ip(&ip(addr)), "{addr} should be public");
        }
    }

    #[test]
    fn test_private_ipv6_ranges() {
        for addr in [
            "::1",
            "::",
            "fc00::1",
            "fd12:3456::1",
            "fe80::1",
            "2001:db8::1",
            "ff02::1",
            "::ffff:192.168.0.1",
            "::127.0.0.1",
            "::10.0.0.1",
            "::8.8.8.8",
            "64:ff9b::7f00:1",
            "64:ff9b::c0a8:105",
            "2002:c0a8:0105::1",
            "2002:7f00:1::",
            "fec0::1",
        ] {
            assert!(is_private_ip(&ip(addr)), "{addr} should be private");
        }
    }

    #[test]
    fn test_public_ipv6() {
        for addr in [
            "2606:4700:4700::1111",
            "2001:4860:4860::8888",
            "::ffff:8.8.8.8",
            "64:ff9b::808:808",
            "2002:808:808::1",
        ] {
            assert!(!is_private_ip(&ip(addr)), "{addr} should be public");
        }
    }

    #[test]
    fn test_literal_ip_from_url() {
        let url = Url::parse("http://[fe80::1]:8080/x").unwrap();
        assert_eq!(literal_ip(&url), Some(ip("fe80::1")));

        let url = Url::parse("https://example.com").unwrap();
        assert_eq!(literal_ip(&url), None);
    }

    #[test]
    fn test_has_private_literal_host() {
        assert!(has_private_literal_host(
            &Url::parse("http://192.168.1.5").unwrap()
        ));
        assert!(has_private_literal_host(
            &Url::parse("http://[::127.0.0.1]/").unwrap()
        ));
        assert!(!has_private_literal_host(
            &Url::parse("http://8.8.8.8").unwrap()
        ));
        assert!(!has_private_literal_host(
            &Url::parse("http://internal.corp").unwrap()
        ));
    }
}
