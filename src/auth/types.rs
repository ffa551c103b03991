//! Auth configuration types
//!
//! These types describe how requests to the store are authenticated
//! and hold the service-account key read from disk.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Default OAuth2 token endpoint for Google service accounts
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scope granting read/write access to Firestore
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Static bearer token (the emulator accepts `owner`)
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Google service account (JWT bearer grant)
    ServiceAccount(ServiceAccountKey),
}

/// Service account key file as downloaded from the cloud console
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Credential type, `service_account` for keys we can use
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    /// Project that owns the service account
    #[serde(default)]
    pub project_id: Option<String>,
    /// Key id, sent as the JWT `kid` header
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// RSA private key (PEM)
    pub private_key: String,
    /// Service account email, the JWT issuer
    pub client_email: String,
    /// Token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Read and parse a key file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = fs::read_to_string(path)
            .map_err(|e| Error::credentials(&display, format!("cannot read file: {e}")))?;

        Self::from_json(&content).map_err(|e| match e {
            Error::Credentials { message, .. } => Error::credentials(display, message),
            other => other,
        })
    }

    /// Parse a key from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let key: Self =
            serde_json::from_str(json).map_err(|e| Error::credentials("<inline>", e.to_string()))?;

        if let Some(kind) = key.key_type.as_deref() {
            if kind != "service_account" {
                return Err(Error::credentials(
                    "<inline>",
                    format!("expected type 'service_account', found '{kind}'"),
                ));
            }
        }
        if key.client_email.is_empty() {
            return Err(Error::credentials("<inline>", "client_email is empty"));
        }
        if key.private_key.is_empty() {
            return Err(Error::credentials("<inline>", "private_key is empty"));
        }

        Ok(key)
    }
}

// Keep the private key out of logs
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_cached_token_not_expired() {
        let token = CachedToken::expires_in("test".to_string(), 3600);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_cached_token_expired() {
        let token = CachedToken::expires_in("test".to_string(), -100);
        assert!(token.is_expired());
    }

    #[test]
    fn test_cached_token_inside_buffer() {
        let token = CachedToken::expires_in("test".to_string(), 10);
        assert!(token.is_expired());
    }

    #[test]
    fn test_cached_token_no_expiration() {
        let token = CachedToken::new("test".to_string(), None);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert!(matches!(config, AuthConfig::None));
    }

    #[test]
    fn test_key_defaults_token_uri() {
        let key = ServiceAccountKey::from_json(
            r#"{"private_key": "pem", "client_email": "svc@proj.iam.gserviceaccount.com"}"#,
        )
        .unwrap();
        assert_eq!(key.token_uri, GOOGLE_TOKEN_URI);
        assert!(key.project_id.is_none());
    }

    #[test]
    fn test_key_rejects_other_credential_types() {
        let err = ServiceAccountKey::from_json(
            r#"{"type": "authorized_user", "private_key": "pem", "client_email": "a@b"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("expected type 'service_account'"));
    }

    #[test]
    fn test_key_missing_fields() {
        let err = ServiceAccountKey::from_json(r#"{"client_email": "a@b"}"#).unwrap_err();
        assert!(err.to_string().contains("private_key"));
    }

    #[test]
    fn test_key_debug_hides_private_key() {
        let key = ServiceAccountKey::from_json(
            r#"{"private_key": "SECRET-PEM", "client_email": "a@b"}"#,
        )
        .unwrap();
        assert!(!format!("{key:?}").contains("SECRET-PEM"));
    }
}
