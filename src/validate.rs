//! SSRF-hardening URL validation.
//!
//! Every outbound fetch goes through [`validate_url`] first. The check order
//! matters: scheme, then hostname presence, then DNS resolution, then a fixed
//! deny list applied to every resolved address. A URL that fails here is never
//! fetched.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use log::debug;
use tokio::net::lookup_host;
use url::Url;

use crate::error::ExtractError;

/// Validate a URL for fetching, rejecting non-http(s) schemes and any target
/// that resolves to a private, loopback, or link-local address.
pub async fn validate_url(raw: &str) -> Result<Url, ExtractError> {
    validate_url_allowing(raw, false).await
}

/// Same as [`validate_url`], optionally skipping the private-address deny
/// list. The scheme and hostname checks always run. The pipeline uses this so
/// test harnesses can fetch from loopback mock servers.
pub(crate) async fn validate_url_allowing(
    raw: &str,
    allow_private: bool,
) -> Result<Url, ExtractError> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        // A bare "example.com/recipe" parses as a relative URL, i.e. it has no
        // scheme at all.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            return Err(ExtractError::UnsupportedScheme)
        }
        Err(_) => return Err(ExtractError::MalformedUrl),
    };

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ExtractError::UnsupportedScheme);
    }

    let addrs = resolve_addresses(&url).await?;
    if !allow_private {
        for addr in &addrs {
            if is_denied(addr) {
                debug!("rejected {raw}: resolves to denied address {addr}");
                return Err(ExtractError::PrivateAddress);
            }
        }
    }

    Ok(url)
}

async fn resolve_addresses(url: &Url) -> Result<Vec<IpAddr>, ExtractError> {
    match url.host() {
        Some(url::Host::Ipv4(ip)) => Ok(vec![IpAddr::V4(ip)]),
        Some(url::Host::Ipv6(ip)) => Ok(vec![IpAddr::V6(ip)]),
        Some(url::Host::Domain(domain)) => {
            if domain.is_empty() {
                return Err(ExtractError::MalformedUrl);
            }
            let port = url.port_or_known_default().unwrap_or(80);
            let addrs: Vec<IpAddr> = lookup_host((domain, port))
                .await
                .map_err(|_| ExtractError::DnsFailure)?
                .map(|sock| sock.ip())
                .collect();
            if addrs.is_empty() {
                return Err(ExtractError::DnsFailure);
            }
            Ok(addrs)
        }
        None => Err(ExtractError::MalformedUrl),
    }
}

/// Membership test against the fixed deny list: IPv4 127.0.0.0/8, 10.0.0.0/8,
/// 172.16.0.0/12, 192.168.0.0/16, 169.254.0.0/16; IPv6 ::1/128 and fc00::/7.
/// IPv4-mapped IPv6 addresses are unwrapped and re-checked so `::ffff:10.0.0.1`
/// cannot slip through.
fn is_denied(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => is_denied_v4(v4),
        IpAddr::V6(v6) => is_denied_v6(v6),
    }
}

fn is_denied_v4(addr: &Ipv4Addr) -> bool {
    let octets = addr.octets();
    match octets {
        [127, ..] => true,
        [10, ..] => true,
        [172, b, ..] if (16..=31).contains(&b) => true,
        [192, 168, ..] => true,
        [169, 254, ..] => true,
        _ => false,
    }
}

fn is_denied_v6(addr: &Ipv6Addr) -> bool {
    if *addr == Ipv6Addr::LOCALHOST {
        return true;
    }
    // fc00::/7 (unique local)
    if addr.segments()[0] & 0xfe00 == 0xfc00 {
        return true;
    }
    if let Some(v4) = addr.to_ipv4_mapped() {
        return is_denied_v4(&v4);
    }
    false
}
