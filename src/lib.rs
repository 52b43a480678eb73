//! Tailnet forward-auth library.
//!
//! Answers one question per proxied request: given the claimed remote
//! address, which tailnet identity is it, and is it allowed under the
//! requested tailnet restriction?

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod whois;

pub use auth::Authorizer;
pub use config::schema::ForwardAuthConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use whois::{IdentityResolver, LocalApiClient};
