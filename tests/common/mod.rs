//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tailnet_forward_auth::auth::{NodeIdentity, UserProfile};
use tailnet_forward_auth::whois::WhoIsError;
use tailnet_forward_auth::{ForwardAuthConfig, HttpServer, IdentityResolver, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// In-memory identity directory keyed by remote address.
#[derive(Default)]
pub struct FakeDirectory {
    identities: HashMap<SocketAddr, NodeIdentity>,
    /// Addresses whose lookup never completes.
    hanging: Vec<SocketAddr>,
    pub lookups: AtomicUsize,
    /// Signalled when a hanging lookup is dropped.
    pub abandoned: Arc<Notify>,
}

#[allow(dead_code)]
impl FakeDirectory {
    pub fn with(mut self, addr: &str, identity: NodeIdentity) -> Self {
        self.identities.insert(addr.parse().unwrap(), identity);
        self
    }

    pub fn hanging(mut self, addr: &str) -> Self {
        self.hanging.push(addr.parse().unwrap());
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

struct NotifyOnDrop(Arc<Notify>);

impl Drop for NotifyOnDrop {
    fn drop(&mut self) {
        self.0.notify_one();
    }
}

#[async_trait]
impl IdentityResolver for FakeDirectory {
    async fn resolve_identity(&self, addr: SocketAddr) -> Result<NodeIdentity, WhoIsError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.hanging.contains(&addr) {
            let _guard = NotifyOnDrop(self.abandoned.clone());
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.identities.get(&addr).cloned().ok_or(WhoIsError::NotFound(addr))
    }
}

/// A user-owned node in `tailnet`.
#[allow(dead_code)]
pub fn user_node(name: &str, tailnet: &str, login: &str) -> NodeIdentity {
    NodeIdentity {
        hostname: format!("{}.{}.beta.tailscale.net", name, tailnet),
        computed_name: name.to_string(),
        profile: UserProfile {
            login_name: login.to_string(),
            display_name: login.split('@').next().unwrap_or_default().to_uppercase(),
            profile_pic_url: String::new(),
        },
        ..Default::default()
    }
}

/// Running server bound to an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_server(config: ForwardAuthConfig, directory: Arc<FakeDirectory>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server = HttpServer::new(config, directory);
    let wait = shutdown.wait();
    tokio::spawn(async move {
        let _ = server.run(listener.into(), wait).await;
    });

    TestServer { addr, shutdown }
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
