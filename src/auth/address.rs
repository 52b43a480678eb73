//! Forwarded address resolution.
//!
//! # Responsibilities
//! - Combine the forwarded host and port header values into one socket address
//! - Reject anything that is not a literal IP plus a decimal port
//!
//! # Design Decisions
//! - Host names are never resolved: the value must already be an IP literal
//! - A bracketed IPv6 host (`[::1]`) is rejected, the proxy sends it bare
//! - The port must be plain ASCII digits (no sign, no whitespace)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Reasons a forwarded host/port pair is not a valid address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid IP address {0:?}")]
    InvalidHost(String),

    #[error("invalid port {0:?}")]
    InvalidPort(String),
}

/// Parse a forwarded host and port into a socket address.
///
/// Callers are expected to have rejected empty values already; an empty
/// string here is simply an invalid host or port.
pub fn resolve_forwarded_address(host: &str, port: &str) -> Result<SocketAddr, AddressError> {
    let ip: IpAddr = host
        .parse()
        .map_err(|_| AddressError::InvalidHost(host.to_string()))?;

    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressError::InvalidPort(port.to_string()));
    }
    let port: u16 = port
        .parse()
        .map_err(|_| AddressError::InvalidPort(port.to_string()))?;

    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_address() {
        let addr = resolve_forwarded_address("100.64.0.1", "443").unwrap();
        assert_eq!(addr, "100.64.0.1:443".parse().unwrap());
    }

    #[test]
    fn test_ipv6_address() {
        let addr = resolve_forwarded_address("fd7a:115c:a1e0::1", "8080").unwrap();
        assert_eq!(addr.to_string(), "[fd7a:115c:a1e0::1]:8080");
    }

    #[test]
    fn test_invalid_hosts() {
        for host in ["", "example.com", "100.64.0.1, 10.0.0.1", "[::1]", "100.64.0.1:80"] {
            assert!(
                matches!(resolve_forwarded_address(host, "443"), Err(AddressError::InvalidHost(_))),
                "host {:?} should be rejected",
                host
            );
        }
    }

    #[test]
    fn test_invalid_ports() {
        for port in ["", "65536", "-1", "+443", " 443", "https", "44 3"] {
            assert!(
                matches!(resolve_forwarded_address("100.64.0.1", port), Err(AddressError::InvalidPort(_))),
                "port {:?} should be rejected",
                port
            );
        }
    }

    #[test]
    fn test_port_bounds() {
        assert_eq!(resolve_forwarded_address("10.0.0.1", "0").unwrap().port(), 0);
        assert_eq!(resolve_forwarded_address("10.0.0.1", "65535").unwrap().port(), 65535);
    }
}
