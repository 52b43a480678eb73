//! Tailnet forward-auth daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────────┐
//!                        │               tailnet-forward-auth              │
//!   reverse proxy        │  ┌──────────┐   ┌──────────┐   ┌────────────┐  │
//!   auth subrequest ─────┼─▶│   net    │──▶│   http   │──▶│    auth    │  │
//!                        │  │ listener │   │ handler  │   │  pipeline  │  │
//!                        │  └──────────┘   └──────────┘   └─────┬──────┘  │
//!                        │                                      │         │
//!                        │                                      ▼         │
//!   204 + Tailscale-*    │                               ┌────────────┐   │      node agent
//!   ◀────────────────────┼───────────────────────────────│   whois    │◀──┼──── (LocalAPI
//!   or 400/401/403       │                               │   client   │   │      socket)
//!                        │                               └────────────┘   │
//!                        └────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use tailnet_forward_auth::config::{load_from_cli, Cli};
use tailnet_forward_auth::lifecycle::{signals, Shutdown};
use tailnet_forward_auth::net::BoundListener;
use tailnet_forward_auth::observability::{logging, metrics};
use tailnet_forward_auth::{HttpServer, LocalApiClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            // Logging is not configured yet; the debug switch may come from the file.
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    logging::init_logging(config.observability.debug);

    tracing::info!(
        network = %config.listener.network,
        address = %config.listener.address,
        whois_socket = %config.whois.socket_path,
        tailnet_suffix = %config.tailnet.internal_suffix,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validated at load time.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = BoundListener::bind(&config.listener).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let resolver = LocalApiClient::new(
        config.whois.socket_path.clone(),
        Duration::from_millis(config.whois.timeout_ms),
    );

    let shutdown = Shutdown::new();
    let _signals = signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, Arc::new(resolver));
    server.run(listener, shutdown.wait()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
