//! Secret payloads.
//!
//! The secrets service wraps the stored JSON in an envelope with its expiry.
//! Git credentials are stored as a table of hosts:
//!
//! ```json
//! { "hosts": { "github.com": { "username": "bot", "password": "ghp_..." } } }
//! ```

use crate::error::TaskclusterError;
use chrono::{DateTime, Utc};
use credential_protocol::{Field, Message};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Response body of the secrets `get` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Secret {
    pub secret: serde_json::Value,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

/// Credentials stored for a single host.
#[derive(Clone, Default, Deserialize)]
pub struct HostSecret {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for HostSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSecret")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Decoded secret contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretContents {
    #[serde(default)]
    pub hosts: HashMap<String, Option<HostSecret>>,
}

impl SecretContents {
    pub fn from_value(value: serde_json::Value) -> Result<Self, TaskclusterError> {
        serde_json::from_value(value).map_err(TaskclusterError::InvalidSecret)
    }

    /// Returns a message carrying only the username and password for `host`.
    pub fn credential_for(&self, host: &str) -> Result<Message, TaskclusterError> {
        let entry = self
            .hosts
            .get(host)
            .and_then(Option::as_ref)
            .ok_or_else(|| TaskclusterError::UnknownHost(host.to_string()))?;

        Ok(Message::new()
            .with(Field::Username, entry.username.as_str())
            .with(Field::Password, entry.password.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contents() -> SecretContents {
        SecretContents::from_value(json!({
            "hosts": {
                "github.com": { "username": "bot", "password": "s3cret" },
                "gitlab.com": { "password": "token-only" },
                "retired.example.com": null
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_credential_for_known_host() {
        let msg = contents().credential_for("github.com").unwrap();
        assert_eq!(msg.username, "bot");
        assert_eq!(msg.password, "s3cret");
        assert!(msg.host.is_empty());
        assert!(msg.protocol.is_empty());
    }

    #[test]
    fn test_missing_username_defaults_empty() {
        let msg = contents().credential_for("gitlab.com").unwrap();
        assert!(msg.username.is_empty());
        assert_eq!(msg.password, "token-only");
    }

    #[test]
    fn test_unknown_host() {
        for host in ["bitbucket.org", "retired.example.com", "GITHUB.COM", ""] {
            match contents().credential_for(host) {
                Err(TaskclusterError::UnknownHost(h)) => assert_eq!(h, host),
                other => panic!("expected unknown host for {:?}, got {:?}", host, other),
            }
        }
    }

    #[test]
    fn test_empty_secret_has_no_hosts() {
        let contents = SecretContents::from_value(json!({})).unwrap();
        assert!(contents.hosts.is_empty());
        assert!(contents.credential_for("github.com").is_err());
    }

    #[test]
    fn test_malformed_secret() {
        let err = SecretContents::from_value(json!({ "hosts": ["github.com"] })).unwrap_err();
        assert!(matches!(err, TaskclusterError::InvalidSecret(_)));
    }

    #[test]
    fn test_envelope_with_expiry() {
        let secret: Secret = serde_json::from_value(json!({
            "secret": { "hosts": {} },
            "expires": "2030-01-01T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(secret.expires.unwrap().to_rfc3339(), "2030-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_host_secret_debug_redacts_password() {
        let entry = HostSecret {
            username: "bot".into(),
            password: "s3cret".into(),
        };
        let debug = format!("{:?}", entry);
        assert!(debug.contains("bot"));
        assert!(!debug.contains("s3cret"));
    }
}
