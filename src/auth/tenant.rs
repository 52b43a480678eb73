//! Tailnet extraction from node hostnames.
//!
//! The directory does not report which tailnet owns a node. For nodes that
//! are not shared in from elsewhere it is encoded in the hostname:
//!
//! ```text
//! node1.tenantA.beta.tailscale.net
//! ^^^^^ ^^^^^^^ ^^^^^^^^^^^^^^^^^^
//! name  tailnet internal suffix (absent for our own tailnet)
//! ```
//!
//! Shared nodes never expose their tailnet, so their label is empty.

use thiserror::Error;

use crate::auth::identity::NodeIdentity;

/// Suffix appended by the directory to tailnet names.
pub const DEFAULT_INTERNAL_SUFFIX: &str = ".beta.tailscale.net";

/// Hostname does not contain `<computed_name>.`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("can't extract tailnet name from hostname {hostname:?} (computed name {computed_name:?})")]
pub struct MalformedHostname {
    pub hostname: String,
    pub computed_name: String,
}

/// Derive the tailnet label of an identity.
///
/// Returns an empty label for shared nodes.
pub fn extract_tailnet(identity: &NodeIdentity, internal_suffix: &str) -> Result<String, MalformedHostname> {
    if identity.is_shared {
        return Ok(String::new());
    }

    let marker = format!("{}.", identity.computed_name);
    let (_, rest) = identity
        .hostname
        .split_once(marker.as_str())
        .ok_or_else(|| MalformedHostname {
            hostname: identity.hostname.clone(),
            computed_name: identity.computed_name.clone(),
        })?;

    let tailnet = rest.strip_suffix(internal_suffix).unwrap_or(rest);
    Ok(tailnet.to_string())
}
