//! Identity lookups through the local node agent.
//!
//! # Responsibilities
//! - Connect to the agent's LocalAPI Unix socket
//! - Issue `GET /localapi/v0/whois?addr=<ip:port>` over HTTP/1.1
//! - Decode the whois response into a `NodeIdentity`
//! - Bound the whole exchange with a timeout

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::http::{header, Request, StatusCode};
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use tokio::net::UnixStream;
use url::form_urlencoded;

use crate::auth::identity::{NodeIdentity, UserProfile};
use crate::observability::metrics;
use crate::whois::{IdentityResolver, WhoIsError};

/// Default LocalAPI socket of the agent.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/tailscale/tailscaled.sock";

/// Host header the agent expects on LocalAPI requests.
const LOCAL_API_HOST: &str = "local-tailscaled.sock";

const WHOIS_PATH: &str = "/localapi/v0/whois";

/// LocalAPI client for one agent socket.
#[derive(Debug, Clone)]
pub struct LocalApiClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl LocalApiClient {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    async fn whois(&self, addr: SocketAddr) -> Result<NodeIdentity, WhoIsError> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(WhoIsError::Connect)?;

        let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(error = %e, "LocalAPI connection closed with error");
            }
        });

        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("addr", &addr.to_string())
            .finish();
        let request = Request::get(format!("{}?{}", WHOIS_PATH, query))
            .header(header::HOST, LOCAL_API_HOST)
            .body(Empty::<Bytes>::new())?;

        let response = sender.send_request(request).await?;
        let status = response.status();
        let body = response.into_body().collect().await?.to_bytes();

        if status == StatusCode::NOT_FOUND {
            return Err(WhoIsError::NotFound(addr));
        }
        if !status.is_success() {
            return Err(WhoIsError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }

        let whois: WhoIsResponse = serde_json::from_slice(&body)?;
        Ok(whois.into())
    }
}

#[async_trait]
impl IdentityResolver for LocalApiClient {
    async fn resolve_identity(&self, addr: SocketAddr) -> Result<NodeIdentity, WhoIsError> {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.whois(addr)).await {
            Ok(result) => result,
            Err(_) => Err(WhoIsError::Timeout(self.timeout)),
        };
        metrics::record_whois(start, result.is_ok());
        result
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WhoIsResponse {
    node: WireNode,
    #[serde(default)]
    user_profile: Option<WireUserProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireNode {
    #[serde(default)]
    name: String,
    #[serde(default)]
    computed_name: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    hostinfo: Option<WireHostinfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireHostinfo {
    #[serde(default)]
    sharee_node: bool,
}

#[derive(Debug, Default, Deserialize)]
struct WireUserProfile {
    #[serde(rename = "LoginName", default)]
    login_name: String,
    #[serde(rename = "DisplayName", default)]
    display_name: String,
    #[serde(rename = "ProfilePicURL", default)]
    profile_pic_url: String,
}

impl From<WhoIsResponse> for NodeIdentity {
    fn from(response: WhoIsResponse) -> Self {
        let node = response.node;
        let profile = response.user_profile.unwrap_or_default();
        let tags = node.tags.unwrap_or_default();

        NodeIdentity {
            hostname: node.name,
            computed_name: node.computed_name,
            is_shared: node.hostinfo.unwrap_or_default().sharee_node,
            is_tagged: !tags.is_empty(),
            tags,
            profile: UserProfile {
                login_name: profile.login_name,
                display_name: profile.display_name,
                profile_pic_url: profile.profile_pic_url,
            },
        }
    }
}
