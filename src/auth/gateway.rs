//! Thin wrapper over the external identity provider.
//!
//! The provider owns the authoritative session; locally we only track
//! "present or absent" plus the signed-in email for display. The trait seam
//! exists so the guards and handlers can be exercised against a mock.

use crate::auth::AuthError;
use crate::APP_USER_AGENT;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

/// Authoritative session as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentitySession {
    pub email: String,
}

/// Authenticated user, used for display only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityUser {
    pub email: String,
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a provider session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, AuthError>;

    /// Drop the provider session. Always succeeds locally: the in-memory
    /// session is cleared even when the remote revocation fails.
    async fn sign_out(&self);

    /// Corroborate that the provider still has an active session.
    async fn current_session(&self) -> Result<Option<IdentitySession>, AuthError>;

    /// Current signed-in user, if any.
    async fn current_user(&self) -> Result<Option<IdentityUser>, AuthError>;
}

pub type SharedGateway = Arc<dyn AuthGateway>;

#[derive(Deserialize)]
struct TokenGrantResponse {
    access_token: String,
    user: UserPayload,
}

#[derive(Deserialize)]
struct UserPayload {
    email: String,
}

struct StoredSession {
    access_token: SecretString,
}

/// HTTP client for a Supabase-style identity API.
///
/// Endpoints used: `POST /auth/v1/token?grant_type=password`,
/// `GET /auth/v1/user` and `POST /auth/v1/logout`.
pub struct IdentityClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    session: RwLock<Option<StoredSession>>,
}

impl IdentityClient {
    /// # Errors
    ///
    /// Returns an error when the base URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str, api_key: SecretString) -> anyhow::Result<Self> {
        // Validate early so a typo fails at startup, not on first login.
        Url::parse(base_url)?;
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            session: RwLock::new(None),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Validate the stored access token against the provider. A 401 means
    /// the provider dropped the session; the stale local copy is cleared.
    async fn fetch_user(&self) -> Result<Option<IdentityUser>, AuthError> {
        let token = {
            let guard = self.session.read().await;
            match guard.as_ref() {
                Some(session) => session.access_token.expose_secret().to_string(),
                None => return Ok(None),
            }
        };

        let response = self
            .client
            .get(self.endpoint_url("/auth/v1/user"))
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|err| AuthError::Network(err.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Identity provider no longer has a session for the stored token");
            self.session.write().await.take();
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(AuthError::Network(format!(
                "identity provider returned {}",
                response.status()
            )));
        }

        let user: UserPayload = response
            .json()
            .await
            .map_err(|err| AuthError::Network(err.to_string()))?;

        Ok(Some(IdentityUser { email: user.email }))
    }
}

#[async_trait]
impl AuthGateway for IdentityClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, AuthError> {
        let response = self
            .client
            .post(self.endpoint_url("/auth/v1/token?grant_type=password"))
            .header("apikey", self.api_key.expose_secret())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|err| AuthError::Network(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }

        if !status.is_success() {
            return Err(AuthError::Network(format!(
                "identity provider returned {status}"
            )));
        }

        let grant: TokenGrantResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Network(err.to_string()))?;

        let session = IdentitySession {
            email: grant.user.email,
        };

        *self.session.write().await = Some(StoredSession {
            access_token: SecretString::from(grant.access_token),
        });

        Ok(session)
    }

    async fn sign_out(&self) {
        let stored = self.session.write().await.take();

        if let Some(stored) = stored {
            let result = self
                .client
                .post(self.endpoint_url("/auth/v1/logout"))
                .header("apikey", self.api_key.expose_secret())
                .bearer_auth(stored.access_token.expose_secret())
                .send()
                .await;

            if let Err(err) = result {
                // Remote revocation is best effort; local state is gone.
                warn!("Failed to revoke identity session: {err}");
            }
        }
    }

    async fn current_session(&self) -> Result<Option<IdentitySession>, AuthError> {
        match self.fetch_user().await? {
            Some(user) => Ok(Some(IdentitySession { email: user.email })),
            None => Ok(None),
        }
    }

    async fn current_user(&self) -> Result<Option<IdentityUser>, AuthError> {
        self.fetch_user().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IdentityClient {
        IdentityClient::new(
            "https://id.elextrio.example/",
            SecretString::from("anon-key".to_string()),
        )
        .expect("client builds")
    }

    #[test]
    fn new_rejects_invalid_url() {
        let result = IdentityClient::new("not a url", SecretString::from(String::new()));
        assert!(result.is_err());
    }

    #[test]
    fn endpoint_url_strips_trailing_slash() {
        let client = client();
        assert_eq!(
            client.endpoint_url("/auth/v1/user"),
            "https://id.elextrio.example/auth/v1/user"
        );
    }

    #[tokio::test]
    async fn current_session_is_none_without_sign_in() {
        let client = client();
        // No stored token: resolved locally, no network round-trip.
        assert_eq!(client.current_session().await.unwrap(), None);
        assert_eq!(client.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn sign_out_without_session_is_a_noop() {
        let client = client();
        client.sign_out().await;
        assert_eq!(client.current_session().await.unwrap(), None);
    }
}
