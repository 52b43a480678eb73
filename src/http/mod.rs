//! HTTP front door.
//!
//! # Data Flow
//! ```text
//! proxy auth subrequest
//!     → server.rs (request ID, trace, timeout layers)
//!     → handler.rs (cancellation token, auth pipeline)
//!     → 204 + Tailscale-* headers | 400 | 401 | 403
//! ```

pub mod handler;
pub mod server;

pub use server::{AppState, HttpServer};

/// Request ID header, generated when the proxy does not send one.
pub const X_REQUEST_ID: &str = "x-request-id";
