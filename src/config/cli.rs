//! Command-line flags.
//!
//! Every flag is optional so that only values given explicitly override the
//! configuration file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{ForwardAuthConfig, Network};

#[derive(Debug, Parser)]
#[command(name = "tailnet-forward-auth")]
#[command(about = "Forward-auth endpoint resolving proxied callers to tailnet identities", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Type of network to listen on [default: tcp]
    #[arg(long, value_enum)]
    pub network: Option<Network>,

    /// Address to listen on [default: 127.0.0.1:]
    #[arg(long)]
    pub addr: Option<String>,

    /// HTTP header field containing the remote IP [default: X-Forwarded-For]
    #[arg(long)]
    pub remote_ip_header: Option<String>,

    /// HTTP header field containing the remote port [default: X-Forwarded-Port]
    #[arg(long)]
    pub remote_port_header: Option<String>,

    /// LocalAPI socket of the node agent
    #[arg(long)]
    pub socket: Option<String>,

    /// Timeout for a single identity lookup, in milliseconds
    #[arg(long)]
    pub whois_timeout_ms: Option<u64>,

    /// Suffix stripped from tailnet names taken from hostnames
    #[arg(long)]
    pub tailnet_suffix: Option<String>,

    /// Timeout for a whole forward-auth request, in seconds
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    pub metrics_addr: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Overlay explicitly given flags onto `config`.
    pub fn apply(&self, config: &mut ForwardAuthConfig) {
        if let Some(network) = self.network {
            config.listener.network = network;
        }
        if let Some(addr) = &self.addr {
            config.listener.address = addr.clone();
        }
        if let Some(header) = &self.remote_ip_header {
            config.headers.remote_ip = header.clone();
        }
        if let Some(header) = &self.remote_port_header {
            config.headers.remote_port = header.clone();
        }
        if let Some(socket) = &self.socket {
            config.whois.socket_path = socket.clone();
        }
        if let Some(timeout) = self.whois_timeout_ms {
            config.whois.timeout_ms = timeout;
        }
        if let Some(suffix) = &self.tailnet_suffix {
            config.tailnet.internal_suffix = suffix.clone();
        }
        if let Some(timeout) = self.request_timeout_secs {
            config.timeouts.request_secs = timeout;
        }
        if let Some(addr) = &self.metrics_addr {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = addr.clone();
        }
        if self.debug {
            config.observability.debug = true;
        }
    }
}
