//! Identity lookup against the node identity directory.
//!
//! # Data Flow
//! ```text
//! forwarded SocketAddr
//!     → IdentityResolver::resolve_identity
//!         → local.rs (HTTP over the local agent's Unix socket)
//!     → NodeIdentity | WhoIsError
//! ```
//!
//! # Design Decisions
//! - The directory is an external collaborator behind a one-method trait,
//!   so the decision pipeline can run against a fake in tests
//! - No caching, no retries: every request performs exactly one lookup
//! - Cancellation is applied by the caller, not by the resolver

pub mod local;

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::identity::NodeIdentity;

pub use local::LocalApiClient;

/// Errors returned by an identity lookup.
#[derive(Debug, Error)]
pub enum WhoIsError {
    /// Could not reach the agent.
    #[error("connecting to identity agent: {0}")]
    Connect(#[source] std::io::Error),

    #[error("identity agent request failed: {0}")]
    Transport(#[from] hyper::Error),

    #[error("building identity request: {0}")]
    Request(#[from] axum::http::Error),

    /// No node owns this address.
    #[error("no identity for {0}")]
    NotFound(SocketAddr),

    #[error("identity agent returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decoding identity response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("identity lookup timed out after {0:?}")]
    Timeout(Duration),

    /// The inbound request went away before the lookup finished.
    #[error("identity lookup cancelled")]
    Cancelled,
}

/// Resolves the identity owning a remote address.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve_identity(&self, addr: SocketAddr) -> Result<NodeIdentity, WhoIsError>;
}
