//! HTTP client for the authorized-keys lookup.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use keyward_core::{AuthorizedKey, KeywardConfig};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ClientError, LookupError};

const AUTHORIZED_KEYS_PATH: &str = "/api/v4/internal/authorized_keys";
const SECRET_HEADER: &str = "Gitlab-Shared-Secret";
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Source of truth for presented public keys.
#[async_trait]
pub trait KeyAuthority: Send + Sync {
    /// Look up a presented key. Exactly one round trip, no retries.
    async fn lookup_key(&self, key: &str) -> Result<AuthorizedKey, LookupError>;
}

/// Error body the authority sends with rejections.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`KeyAuthority`] backed by the authority's internal HTTP API.
#[derive(Debug, Clone)]
pub struct HttpKeyAuthority {
    client: Client,
    endpoint: String,
    secret: Option<String>,
    basic_auth: Option<(String, Option<String>)>,
}

impl HttpKeyAuthority {
    /// Build a client from configuration. Reads the shared secret file if present.
    pub fn new(config: &KeywardConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.read_timeout())
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        let secret = config
            .resolve_secret()?
            .map(|secret| STANDARD.encode(secret.as_bytes()));

        let basic_auth = config
            .http_settings
            .user
            .clone()
            .map(|user| (user, config.http_settings.password.clone()));

        Ok(Self {
            client,
            endpoint: endpoint(&config.authority_url),
            secret,
            basic_auth,
        })
    }

    /// Full URL of the lookup endpoint, without query.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), AUTHORIZED_KEYS_PATH)
}

#[async_trait]
impl KeyAuthority for HttpKeyAuthority {
    async fn lookup_key(&self, key: &str) -> Result<AuthorizedKey, LookupError> {
        let correlation_id = Uuid::new_v4();

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("key", key)])
            .header(REQUEST_ID_HEADER, correlation_id.to_string());

        if let Some(secret) = &self.secret {
            request = request.header(SECRET_HEADER, secret);
        }
        if let Some((user, password)) = &self.basic_auth {
            request = request.basic_auth(user, password.as_ref());
        }

        tracing::debug!(%correlation_id, endpoint = %self.endpoint, "Looking up authorized key");

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await.map_err(transport_error)?;
            let found: AuthorizedKey = serde_json::from_slice(&body)
                .map_err(|e| LookupError::MalformedBody(e.to_string()))?;
            tracing::debug!(%correlation_id, key_id = found.id, "Authority found key");
            return Ok(found);
        }

        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| reason(status));
            tracing::debug!(%correlation_id, status = status.as_u16(), %message, "Authority rejected key");
            return Err(LookupError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::warn!(%correlation_id, status = status.as_u16(), "Authority returned unexpected status");
        Err(LookupError::Status {
            status: status.as_u16(),
        })
    }
}

fn transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Transport(err.to_string())
    }
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        assert_eq!(
            endpoint("http://localhost:3000/"),
            "http://localhost:3000/api/v4/internal/authorized_keys"
        );
        assert_eq!(
            endpoint("https://gitlab.example.com/gitlab"),
            "https://gitlab.example.com/gitlab/api/v4/internal/authorized_keys"
        );
    }

    #[test]
    fn test_new_encodes_secret() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".gitlab_shell_secret"), "secret\n").unwrap();

        let config = KeywardConfig::new(dir.path(), "http://localhost:3000");
        let authority = HttpKeyAuthority::new(&config).unwrap();
        assert_eq!(authority.secret.as_deref(), Some("c2VjcmV0"));
        assert_eq!(
            authority.endpoint(),
            "http://localhost:3000/api/v4/internal/authorized_keys"
        );
    }

    #[test]
    fn test_new_without_secret() {
        let dir = tempdir().unwrap();
        let config = KeywardConfig::new(dir.path(), "http://localhost:3000");
        let authority = HttpKeyAuthority::new(&config).unwrap();
        assert!(authority.secret.is_none());
        assert!(authority.basic_auth.is_none());
    }

    #[test]
    fn test_key_record_body() {
        let found: AuthorizedKey =
            serde_json::from_str(r#"{"id": 42, "key": "ssh-ed25519 AAAA"}"#).unwrap();
        assert_eq!(found.id, 42);
        assert_eq!(found.key, "ssh-ed25519 AAAA");

        assert!(serde_json::from_str::<AuthorizedKey>(r#"{"id": "1", "key": "k"}"#).is_err());
        assert!(serde_json::from_str::<ErrorBody>(r#"{"message": "Forbidden!"}"#).is_ok());
    }

    #[test]
    fn test_reason_fallback() {
        assert_eq!(reason(StatusCode::NOT_FOUND), "Not Found");
    }
}
