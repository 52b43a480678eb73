//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate header names and value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ForwardAuthConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::ForwardAuthConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listen address not set")]
    EmptyListenAddress,

    #[error("{field} is not a valid HTTP header name: {value:?}")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("remote IP and remote port headers must differ (both {0:?})")]
    DuplicateHeaderName(String),

    #[error("whois socket path not set")]
    EmptySocketPath,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &ForwardAuthConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.address.trim().is_empty() {
        errors.push(ValidationError::EmptyListenAddress);
    }

    let headers = [
        ("headers.remote_ip", &config.headers.remote_ip),
        ("headers.remote_port", &config.headers.remote_port),
    ];
    for (field, value) in headers {
        if HeaderName::from_bytes(value.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName {
                field,
                value: value.clone(),
            });
        }
    }
    if config.headers.remote_ip.eq_ignore_ascii_case(&config.headers.remote_port) {
        errors.push(ValidationError::DuplicateHeaderName(config.headers.remote_ip.clone()));
    }

    if config.whois.socket_path.is_empty() {
        errors.push(ValidationError::EmptySocketPath);
    }
    if config.whois.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("whois.timeout_ms"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
