//! The forward-auth route.
//!
//! Translates the pipeline outcome into a bare status code, plus the identity
//! headers when the request is allowed. Failure detail is logged, never sent.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;

use crate::auth::{AuthError, ErrorClass};
use crate::http::server::AppState;
use crate::http::X_REQUEST_ID;
use crate::observability::metrics;

/// Handle one forward-auth subrequest.
pub async fn forward_auth_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(request_id = %request_id, headers = ?headers, "Received request");

    // Dropping this future (client gone, request timed out) cancels the lookup.
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let identity = match state.authorizer.authorize(&headers, &cancel).await {
        Ok(identity) => identity,
        Err(e) => return reject(&request_id, e),
    };

    match identity.to_header_map() {
        Ok(response_headers) => {
            tracing::debug!(
                request_id = %request_id,
                tailnet = %identity.tailnet,
                user = %identity.user,
                "Request allowed"
            );
            metrics::record_decision("allowed");
            (StatusCode::NO_CONTENT, response_headers).into_response()
        }
        Err(e) => reject(&request_id, e),
    }
}

fn reject(request_id: &str, err: AuthError) -> Response {
    let class = err.class();
    match class {
        ErrorClass::ClientInput => tracing::info!(request_id = %request_id, error = %err, "Bad forward-auth request"),
        ErrorClass::Identity => tracing::warn!(request_id = %request_id, error = %err, "Unauthorized"),
        ErrorClass::Policy => tracing::warn!(request_id = %request_id, error = %err, "Forbidden"),
        ErrorClass::Internal => tracing::error!(request_id = %request_id, error = %err, "Can't emit identity headers"),
    }
    metrics::record_decision(class.outcome());
    class.status_code().into_response()
}
