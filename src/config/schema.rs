//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the daemon.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::auth::tenant::DEFAULT_INTERNAL_SUFFIX;
use crate::whois::local::DEFAULT_SOCKET_PATH;

/// Root configuration for the forward-auth daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ForwardAuthConfig {
    /// Listener configuration (network type, address).
    pub listener: ListenerConfig,

    /// Names of the proxy-supplied forwarded address headers.
    pub headers: HeaderConfig,

    /// Identity agent settings.
    pub whois: WhoIsConfig,

    /// Tailnet derivation settings.
    pub tailnet: TailnetConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network type to listen on.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// TCP over IPv4 or IPv6.
    #[default]
    Tcp,
    /// TCP over IPv4 only.
    Tcp4,
    /// TCP over IPv6 only.
    Tcp6,
    /// Unix domain socket; the address is a filesystem path.
    Unix,
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Network::Tcp => "tcp",
            Network::Tcp4 => "tcp4",
            Network::Tcp6 => "tcp6",
            Network::Unix => "unix",
        };
        f.write_str(name)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    pub network: Network,

    /// Bind address (e.g., "127.0.0.1:8080"). An empty port picks a free one.
    pub address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            network: Network::Tcp,
            address: "127.0.0.1:".to_string(),
        }
    }
}

/// Forwarded address header names.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HeaderConfig {
    /// Header carrying the remote IP.
    pub remote_ip: String,

    /// Header carrying the remote port.
    pub remote_port: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            remote_ip: "X-Forwarded-For".to_string(),
            remote_port: "X-Forwarded-Port".to_string(),
        }
    }
}

/// Identity agent configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WhoIsConfig {
    /// Path of the agent's LocalAPI socket.
    pub socket_path: String,

    /// Upper bound for a single lookup in milliseconds.
    pub timeout_ms: u64,
}

impl Default for WhoIsConfig {
    fn default() -> Self {
        Self {
            socket_path: DEFAULT_SOCKET_PATH.to_string(),
            timeout_ms: 5_000,
        }
    }
}

/// Tailnet derivation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TailnetConfig {
    /// Suffix stripped from the hostname remainder when present.
    pub internal_suffix: String,
}

impl Default for TailnetConfig {
    fn default() -> Self {
        Self {
            internal_suffix: DEFAULT_INTERNAL_SUFFIX.to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for one decision) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable debug logging (including inbound request headers).
    pub debug: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            debug: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
