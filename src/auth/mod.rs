//! Forward-auth decision pipeline.
//!
//! # Data Flow
//! ```text
//! inbound headers
//!     → address.rs   (forwarded host + port → SocketAddr)       400 / 401
//!     → whois        (SocketAddr → NodeIdentity)                401
//!     → tenant.rs    (NodeIdentity → tailnet label)             401
//!     → decision.rs  (tailnet vs Expected-Tailnet)              403
//!     → headers.rs   (identity → Tailscale-* response headers)
//! ```
//!
//! # Design Decisions
//! - Every stage is one-shot; the first failure ends the request
//! - Nothing is shared between requests except the read-only configuration
//! - The lookup is raced against the request's cancellation token

pub mod address;
pub mod decision;
pub mod headers;
pub mod identity;
pub mod tenant;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue};
use tokio_util::sync::CancellationToken;

use crate::config::schema::{ForwardAuthConfig, HeaderConfig};
use crate::whois::{IdentityResolver, WhoIsError};

pub use address::{resolve_forwarded_address, AddressError};
pub use decision::{check_expected_tailnet, AuthError, ErrorClass};
pub use headers::{IdentityHeaders, EXPECTED_TAILNET};
pub use identity::{NodeIdentity, UserProfile};
pub use tenant::{extract_tailnet, MalformedHostname, DEFAULT_INTERNAL_SUFFIX};

/// Runs the decision pipeline for one request at a time.
#[derive(Clone)]
pub struct Authorizer {
    headers: HeaderConfig,
    internal_suffix: String,
    resolver: Arc<dyn IdentityResolver>,
}

impl Authorizer {
    pub fn new(config: &ForwardAuthConfig, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self {
            headers: config.headers.clone(),
            internal_suffix: config.tailnet.internal_suffix.clone(),
            resolver,
        }
    }

    /// Decide whether the request described by `headers` may pass.
    ///
    /// On success returns the identity headers to hand back to the proxy.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        cancel: &CancellationToken,
    ) -> Result<IdentityHeaders, AuthError> {
        let remote_addr = self.forwarded_address(headers)?;

        let identity = tokio::select! {
            _ = cancel.cancelled() => Err(WhoIsError::Cancelled),
            result = self.resolver.resolve_identity(remote_addr) => result,
        }
        .map_err(|source| AuthError::Lookup {
            addr: remote_addr,
            source,
        })?;

        let tailnet = extract_tailnet(&identity, &self.internal_suffix)?;

        let expected = headers.get(EXPECTED_TAILNET).map(|v| v.as_bytes());
        check_expected_tailnet(&tailnet, expected)?;

        Ok(IdentityHeaders::new(&identity, tailnet))
    }

    fn forwarded_address(&self, headers: &HeaderMap) -> Result<SocketAddr, AuthError> {
        let host = required_header(headers, &self.headers.remote_ip)?;
        let port = required_header(headers, &self.headers.remote_port)?;

        let lossy = |value: &HeaderValue| String::from_utf8_lossy(value.as_bytes()).into_owned();
        let host_str = host
            .to_str()
            .map_err(|_| AddressError::InvalidHost(lossy(host)));
        let port_str = port
            .to_str()
            .map_err(|_| AddressError::InvalidPort(lossy(port)));

        host_str
            .and_then(|host| port_str.and_then(|port| resolve_forwarded_address(host, port)))
            .map_err(|source| AuthError::InvalidAddress { source })
    }
}

fn required_header<'a>(
    headers: &'a HeaderMap,
    name: &str,
) -> Result<&'a HeaderValue, AuthError> {
    headers
        .get(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AuthError::MissingHeader {
            header: name.to_string(),
        })
}
