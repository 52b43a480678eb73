//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forward-auth handler
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Serve on a TCP or Unix listener until shutdown

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::any, Router};
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::Authorizer;
use crate::config::ForwardAuthConfig;
use crate::http::handler::forward_auth_handler;
use crate::net::BoundListener;
use crate::whois::IdentityResolver;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub authorizer: Authorizer,
}

/// HTTP server for the forward-auth endpoint.
pub struct HttpServer {
    router: Router,
    config: Arc<ForwardAuthConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and identity source.
    pub fn new(config: ForwardAuthConfig, resolver: Arc<dyn IdentityResolver>) -> Self {
        let state = AppState {
            authorizer: Authorizer::new(&config, resolver),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config: Arc::new(config),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ForwardAuthConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(forward_auth_handler))
            .route("/{*path}", any(forward_auth_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Router with all layers applied, for serving or driving directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: BoundListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            remote_ip_header = %self.config.headers.remote_ip,
            remote_port_header = %self.config.headers.remote_port,
            "HTTP server starting"
        );

        match listener {
            BoundListener::Tcp(listener) => {
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(shutdown)
                    .await?
            }
            BoundListener::Unix(listener) => {
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(shutdown)
                    .await?
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ForwardAuthConfig {
        &self.config
    }
}
