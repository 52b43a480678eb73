//! Listener binding for the configured network type.
//!
//! # Responsibilities
//! - Bind TCP (dual, IPv4-only, IPv6-only) or Unix domain socket listeners
//! - Accept `host:` (empty port) as "pick a free port"
//! - Report the address actually bound

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tokio::net::{TcpListener, UnixListener};

use crate::config::{ListenerConfig, Network};

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to resolve the listen address.
    #[error("can't resolve {address}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Address resolved, but not to the requested address family.
    #[error("no {network} address found for {address}")]
    NoAddress { network: Network, address: String },

    /// Failed to bind to address.
    #[error("can't listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Address a listener is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenAddr {
    Tcp(SocketAddr),
    Unix(PathBuf),
}

impl fmt::Display for ListenAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenAddr::Tcp(addr) => write!(f, "{}", addr),
            ListenAddr::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

/// A bound listener of either supported kind.
#[derive(Debug)]
pub enum BoundListener {
    Tcp(TcpListener),
    Unix(UnixListener),
}

impl BoundListener {
    /// Bind to the configured network and address.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let listener = match config.network {
            Network::Unix => {
                let listener = UnixListener::bind(&config.address).map_err(|source| ListenerError::Bind {
                    address: config.address.clone(),
                    source,
                })?;
                BoundListener::Unix(listener)
            }
            network => BoundListener::Tcp(bind_tcp(network, &config.address).await?),
        };

        tracing::info!(
            network = %config.network,
            address = %config.address,
            "Listener bound"
        );
        Ok(listener)
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<ListenAddr, std::io::Error> {
        match self {
            BoundListener::Tcp(listener) => listener.local_addr().map(ListenAddr::Tcp),
            BoundListener::Unix(listener) => {
                let addr = listener.local_addr()?;
                Ok(ListenAddr::Unix(
                    addr.as_pathname().map(PathBuf::from).unwrap_or_default(),
                ))
            }
        }
    }
}

impl From<TcpListener> for BoundListener {
    fn from(listener: TcpListener) -> Self {
        BoundListener::Tcp(listener)
    }
}

async fn bind_tcp(network: Network, address: &str) -> Result<TcpListener, ListenerError> {
    let normalized = normalize_tcp_address(network, address);
    let candidates: Vec<SocketAddr> = tokio::net::lookup_host(normalized.as_str())
        .await
        .map_err(|source| ListenerError::Resolve {
            address: address.to_string(),
            source,
        })?
        .filter(|addr| match network {
            Network::Tcp4 => addr.is_ipv4(),
            Network::Tcp6 => addr.is_ipv6(),
            _ => true,
        })
        .collect();

    let mut last_error = None;
    for candidate in candidates {
        match TcpListener::bind(candidate).await {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                tracing::debug!(address = %candidate, error = %e, "Bind attempt failed");
                last_error = Some(e);
            }
        }
    }

    Err(match last_error {
        Some(source) => ListenerError::Bind {
            address: address.to_string(),
            source,
        },
        None => ListenerError::NoAddress {
            network,
            address: address.to_string(),
        },
    })
}

/// Fill in the parts `host:port` may leave out.
///
/// `host:` binds a free port and `:port` binds every interface.
fn normalize_tcp_address(network: Network, address: &str) -> String {
    let mut address = address.to_string();
    if address.ends_with(':') {
        address.push('0');
    }
    if address.starts_with(':') {
        let any = if network == Network::Tcp6 { "[::]" } else { "0.0.0.0" };
        address.insert_str(0, any);
    }
    address
}
