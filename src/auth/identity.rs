//! Node identity records returned by the identity directory.
//!
//! A `NodeIdentity` is created fresh for every lookup and dropped when the
//! request completes. Nothing here is cached.

/// Identity of the node behind a forwarded address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeIdentity {
    /// Fully-qualified node name, e.g. `node1.tenant.beta.tailscale.net`.
    pub hostname: String,

    /// Short name computed by the directory, e.g. `node1`.
    pub computed_name: String,

    /// Node was shared into this tailnet from another one.
    pub is_shared: bool,

    /// Node authenticates with tags instead of a user login.
    pub is_tagged: bool,

    /// Capability tags (`tag:server`, ...). Empty for user-owned nodes.
    pub tags: Vec<String>,

    /// Owning user's profile.
    pub profile: UserProfile,
}

/// User profile attached to an identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    /// Login name including its domain, e.g. `alice@example.com`.
    pub login_name: String,

    pub display_name: String,

    /// May be empty.
    pub profile_pic_url: String,
}

impl UserProfile {
    /// Local part of the login name (everything before the first `@`).
    pub fn login_local_part(&self) -> &str {
        self.login_name
            .split_once('@')
            .map(|(local, _)| local)
            .unwrap_or(&self.login_name)
    }
}
