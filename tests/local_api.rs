//! LocalAPI client against a mock node agent on a Unix socket.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tailnet_forward_auth::whois::WhoIsError;
use tailnet_forward_auth::{IdentityResolver, LocalApiClient};
use tokio::net::UnixListener;

async fn whois(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if headers.get("host").map(|h| h != "local-tailscaled.sock").unwrap_or(true) {
        return (StatusCode::FORBIDDEN, "bad host").into_response();
    }

    match params.get("addr").map(String::as_str) {
        Some("100.64.0.1:443") => (
            StatusCode::OK,
            r#"{
                "Node": {
                    "Name": "node1.tenantA.beta.tailscale.net",
                    "ComputedName": "node1",
                    "Hostinfo": {"OS": "linux"}
                },
                "UserProfile": {
                    "LoginName": "alice@example.com",
                    "DisplayName": "Alice",
                    "ProfilePicURL": ""
                }
            }"#,
        )
            .into_response(),
        Some("[fd7a:115c:a1e0::1]:8443") => (
            StatusCode::OK,
            r#"{"Node": {"Name": "ci.tenantA.beta.tailscale.net", "ComputedName": "ci",
                "Tags": ["tag:ci"], "Hostinfo": {"ShareeNode": true}}}"#,
        )
            .into_response(),
        Some("100.64.0.3:443") => (StatusCode::OK, "not json").into_response(),
        Some("100.64.0.4:443") => (StatusCode::INTERNAL_SERVER_ERROR, "backend down\n").into_response(),
        Some("100.64.0.5:443") => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK.into_response()
        }
        _ => (StatusCode::NOT_FOUND, "no match for IP:port").into_response(),
    }
}

struct MockAgent {
    _dir: tempfile::TempDir,
    socket: PathBuf,
}

async fn start_agent() -> MockAgent {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("tailscaled.sock");
    let listener = UnixListener::bind(&socket).unwrap();
    let app = Router::new().route("/localapi/v0/whois", get(whois));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    MockAgent { _dir: dir, socket }
}

fn client(agent: &MockAgent) -> LocalApiClient {
    LocalApiClient::new(agent.socket.clone(), Duration::from_secs(2))
}

#[tokio::test]
async fn test_whois_user_node() {
    let agent = start_agent().await;
    let identity = client(&agent)
        .resolve_identity("100.64.0.1:443".parse().unwrap())
        .await
        .unwrap();

    assert_eq!(identity.hostname, "node1.tenantA.beta.tailscale.net");
    assert_eq!(identity.computed_name, "node1");
    assert!(!identity.is_shared);
    assert!(!identity.is_tagged);
    assert_eq!(identity.profile.login_name, "alice@example.com");
    assert_eq!(identity.profile.display_name, "Alice");
}

#[tokio::test]
async fn test_whois_ipv6_shared_tagged_node() {
    let agent = start_agent().await;
    let identity = client(&agent)
        .resolve_identity("[fd7a:115c:a1e0::1]:8443".parse().unwrap())
        .await
        .unwrap();

    assert!(identity.is_shared);
    assert!(identity.is_tagged);
    assert_eq!(identity.tags, vec!["tag:ci"]);
    assert_eq!(identity.profile.login_name, "");
}

#[tokio::test]
async fn test_whois_not_found() {
    let agent = start_agent().await;
    let err = client(&agent)
        .resolve_identity("100.64.0.2:443".parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, WhoIsError::NotFound(addr) if addr.to_string() == "100.64.0.2:443"));
}

#[tokio::test]
async fn test_whois_bad_responses() {
    let agent = start_agent().await;
    let client = client(&agent);

    let err = client.resolve_identity("100.64.0.3:443".parse().unwrap()).await.unwrap_err();
    assert!(matches!(err, WhoIsError::Decode(_)));

    let err = client.resolve_identity("100.64.0.4:443".parse().unwrap()).await.unwrap_err();
    match err {
        WhoIsError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "backend down");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_whois_timeout() {
    let agent = start_agent().await;
    let client = LocalApiClient::new(agent.socket.clone(), Duration::from_millis(100));
    let err = client.resolve_identity("100.64.0.5:443".parse().unwrap()).await.unwrap_err();
    assert!(matches!(err, WhoIsError::Timeout(d) if d == Duration::from_millis(100)));
}

#[tokio::test]
async fn test_whois_agent_not_running() {
    let dir = tempfile::tempdir().unwrap();
    let client = LocalApiClient::new(dir.path().join("missing.sock"), Duration::from_secs(1));
    let err = client.resolve_identity("100.64.0.1:443".parse().unwrap()).await.unwrap_err();
    assert!(matches!(err, WhoIsError::Connect(_)));
}
