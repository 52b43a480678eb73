//! Authorization decision and the error taxonomy of the pipeline.

use std::net::SocketAddr;

use axum::http::StatusCode;
use thiserror::Error;
use url::form_urlencoded;

use crate::auth::address::AddressError;
use crate::auth::tenant::MalformedHostname;
use crate::whois::WhoIsError;

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller did not send the forwarded address. Not a security event.
    ClientInput,
    /// Caller could not be identified.
    Identity,
    /// Caller was identified but is outside the expected tailnet.
    Policy,
    /// Identity was resolved but could not be written out.
    Internal,
}

impl ErrorClass {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorClass::ClientInput => StatusCode::BAD_REQUEST,
            ErrorClass::Identity => StatusCode::UNAUTHORIZED,
            ErrorClass::Policy => StatusCode::FORBIDDEN,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for metrics.
    pub fn outcome(self) -> &'static str {
        match self {
            ErrorClass::ClientInput => "bad_request",
            ErrorClass::Identity => "unauthorized",
            ErrorClass::Policy => "forbidden",
            ErrorClass::Internal => "internal_error",
        }
    }
}

/// Terminal failure of a forward-auth request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing header {header}")]
    MissingHeader { header: String },

    #[error("remote address and port are not valid: {source}")]
    InvalidAddress {
        #[source]
        source: AddressError,
    },

    #[error("can't look up {addr}: {source}")]
    Lookup {
        addr: SocketAddr,
        #[source]
        source: WhoIsError,
    },

    #[error(transparent)]
    MalformedHostname(#[from] MalformedHostname),

    /// `expected` is caller supplied and already percent-encoded.
    #[error("user is part of tailnet {actual:?}, wanted: {expected}")]
    TailnetMismatch { actual: String, expected: String },

    #[error("value for header {header} is not a valid header value")]
    InvalidHeaderValue { header: &'static str },
}

impl AuthError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AuthError::MissingHeader { .. } => ErrorClass::ClientInput,
            AuthError::InvalidAddress { .. }
            | AuthError::Lookup { .. }
            | AuthError::MalformedHostname(_) => ErrorClass::Identity,
            AuthError::TailnetMismatch { .. } => ErrorClass::Policy,
            AuthError::InvalidHeaderValue { .. } => ErrorClass::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.class().status_code()
    }
}

/// Enforce the optional expected tailnet.
///
/// `expected` comes straight from the request. It may only narrow access:
/// when absent or empty every tailnet, including the empty one of shared
/// nodes, is accepted. Comparison is exact and case-sensitive.
pub fn check_expected_tailnet(tailnet: &str, expected: Option<&[u8]>) -> Result<(), AuthError> {
    match expected {
        Some(expected) if !expected.is_empty() && expected != tailnet.as_bytes() => {
            Err(AuthError::TailnetMismatch {
                actual: tailnet.to_string(),
                expected: form_urlencoded::byte_serialize(expected).collect(),
            })
        }
        _ => Ok(()),
    }
}
