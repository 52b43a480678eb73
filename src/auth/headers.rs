//! Identity headers returned to the proxy on success.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::auth::decision::AuthError;
use crate::auth::identity::NodeIdentity;

/// Optional request header restricting access to one tailnet.
pub const EXPECTED_TAILNET: &str = "Expected-Tailnet";

pub const TAILSCALE_TAILNET: &str = "Tailscale-Tailnet";
pub const TAILSCALE_LOGIN: &str = "Tailscale-Login";
pub const TAILSCALE_USER: &str = "Tailscale-User";
pub const TAILSCALE_NAME: &str = "Tailscale-Name";
pub const TAILSCALE_PROFILE_PICTURE: &str = "Tailscale-Profile-Picture";
pub const TAILSCALE_ACL_TAGS: &str = "Tailscale-Acl-Tags";

/// Header values derived from an allowed identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub tailnet: String,
    /// Login name without its domain.
    pub login: String,
    /// Full login name.
    pub user: String,
    pub name: String,
    pub profile_picture: Option<String>,
    /// Comma separated tags of a tagged node.
    pub acl_tags: Option<String>,
}

impl IdentityHeaders {
    pub fn new(identity: &NodeIdentity, tailnet: String) -> Self {
        let profile = &identity.profile;

        // Tagged nodes are allowed through; the tags are surfaced for the app.
        let acl_tags = if identity.is_tagged {
            Some(identity.tags.join(",")).filter(|tags| !tags.is_empty())
        } else {
            None
        };

        Self {
            tailnet,
            login: profile.login_local_part().to_string(),
            user: profile.login_name.clone(),
            name: profile.display_name.clone(),
            profile_picture: Some(profile.profile_pic_url.clone()).filter(|url| !url.is_empty()),
            acl_tags,
        }
    }

    /// Header names and values in emission order. Optional headers are omitted when unset.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut entries = vec![
            (TAILSCALE_TAILNET, self.tailnet.as_str()),
            (TAILSCALE_LOGIN, self.login.as_str()),
            (TAILSCALE_USER, self.user.as_str()),
            (TAILSCALE_NAME, self.name.as_str()),
        ];
        if let Some(picture) = &self.profile_picture {
            entries.push((TAILSCALE_PROFILE_PICTURE, picture));
        }
        if let Some(tags) = &self.acl_tags {
            entries.push((TAILSCALE_ACL_TAGS, tags));
        }
        entries
    }

    /// Build the response header map.
    ///
    /// Fails without a partial map if any value contains bytes that HTTP
    /// header values cannot carry.
    pub fn to_header_map(&self) -> Result<HeaderMap, AuthError> {
        let mut headers = HeaderMap::new();
        for (name, value) in self.entries() {
            let value = HeaderValue::from_bytes(value.as_bytes())
                .map_err(|_| AuthError::InvalidHeaderValue { header: name })?;
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| AuthError::InvalidHeaderValue { header: name })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::UserProfile;

    fn alice() -> NodeIdentity {
        NodeIdentity {
            hostname: "node1.tenantA.beta.tailscale.net".into(),
            computed_name: "node1".into(),
            profile: UserProfile {
                login_name: "alice@example.com".into(),
                display_name: "Alice Liddell".into(),
                profile_pic_url: String::new(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_user_headers() {
        let headers = IdentityHeaders::new(&alice(), "tenantA".into());
        assert_eq!(headers.tailnet, "tenantA");
        assert_eq!(headers.login, "alice");
        assert_eq!(headers.user, "alice@example.com");
        assert_eq!(headers.name, "Alice Liddell");
        assert_eq!(headers.profile_picture, None);
        assert_eq!(headers.acl_tags, None);

        let map = headers.to_header_map().unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map.get(TAILSCALE_TAILNET).unwrap(), "tenantA");
        assert_eq!(map.get(TAILSCALE_LOGIN).unwrap(), "alice");
        assert_eq!(map.get(TAILSCALE_USER).unwrap(), "alice@example.com");
        assert_eq!(map.get(TAILSCALE_NAME).unwrap(), "Alice Liddell");
        assert!(map.get(TAILSCALE_PROFILE_PICTURE).is_none());
    }

    #[test]
    fn test_empty_tailnet_is_still_set() {
        let map = IdentityHeaders::new(&alice(), String::new()).to_header_map().unwrap();
        assert_eq!(map.get(TAILSCALE_TAILNET).unwrap(), "");
    }

    #[test]
    fn test_profile_picture() {
        let mut id = alice();
        id.profile.profile_pic_url = "https://example.com/alice.png".into();
        let map = IdentityHeaders::new(&id, "tenantA".into()).to_header_map().unwrap();
        assert_eq!(
            map.get(TAILSCALE_PROFILE_PICTURE).unwrap(),
            "https://example.com/alice.png"
        );
    }

    #[test]
    fn test_tagged_node() {
        let mut id = alice();
        id.is_tagged = true;
        id.tags = vec!["tag:server".into(), "tag:prod".into()];
        let map = IdentityHeaders::new(&id, "tenantA".into()).to_header_map().unwrap();
        assert_eq!(map.get(TAILSCALE_ACL_TAGS).unwrap(), "tag:server,tag:prod");
    }

    #[test]
    fn test_tags_ignored_when_not_tagged() {
        let mut id = alice();
        id.tags = vec!["tag:server".into()];
        assert_eq!(IdentityHeaders::new(&id, "t".into()).acl_tags, None);

        let mut id = alice();
        id.is_tagged = true;
        assert_eq!(IdentityHeaders::new(&id, "t".into()).acl_tags, None);
    }

    #[test]
    fn test_utf8_display_name() {
        let mut id = alice();
        id.profile.display_name = "Zoë".into();
        let map = IdentityHeaders::new(&id, "t".into()).to_header_map().unwrap();
        assert_eq!(map.get(TAILSCALE_NAME).unwrap().as_bytes(), "Zoë".as_bytes());
    }

    #[test]
    fn test_control_characters_rejected() {
        let mut id = alice();
        id.profile.display_name = "Alice\r\nSet-Cookie: x".into();
        let err = IdentityHeaders::new(&id, "t".into()).to_header_map().unwrap_err();
        assert!(matches!(err, AuthError::InvalidHeaderValue { header: TAILSCALE_NAME }));
    }
}
