//! Login flow state machine.
//!
//! `GET /login` drives the session probe (`CheckingSession`), `POST /login`
//! drives the submit. The probe races a timeout against the gateway check
//! via `tokio::time::timeout`: when the budget elapses the slow check is
//! dropped, so a late resolution can never flip state afterwards.

use crate::auth::gateway::AuthGateway;
use crate::auth::token::{IssuedVia, SessionToken, SessionTokenStore};
use crate::auth::{normalize_email, valid_email, AuthError};
use crate::guard::{ADMIN_HOME, PROTECTED_PREFIX};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Budget for the on-entry session probe.
pub const SESSION_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Outcome of the `CheckingSession` state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Already authenticated: navigate away from the login page. `issued`
    /// carries a fresh marker when the session was restored from the
    /// identity provider rather than found locally.
    Redirect {
        to: String,
        issued: Option<SessionToken>,
    },
    /// Render the credential form; `notice` surfaces probe failures
    /// without blocking manual continuation.
    Form { notice: Option<String> },
}

/// Resolve the navigation target from the `redirectTo` parameter.
///
/// Only local paths are honored. A target inside the protected prefix that
/// itself encodes another redirect means we are in a redirect cycle; force
/// the dashboard root instead of the nested target.
#[must_use]
pub fn sanitize_target(redirect_to: Option<&str>) -> String {
    let Some(target) = redirect_to else {
        return ADMIN_HOME.to_string();
    };

    if target.is_empty() || !target.starts_with('/') || target.starts_with("//") {
        return ADMIN_HOME.to_string();
    }

    if target.starts_with(PROTECTED_PREFIX) && target.contains("redirectTo=") {
        return ADMIN_HOME.to_string();
    }

    target.to_string()
}

pub struct LoginFlow<'a> {
    gateway: &'a dyn AuthGateway,
    tokens: &'a SessionTokenStore,
}

impl<'a> LoginFlow<'a> {
    #[must_use]
    pub fn new(gateway: &'a dyn AuthGateway, tokens: &'a SessionTokenStore) -> Self {
        Self { gateway, tokens }
    }

    /// `CheckingSession`: token store first, identity provider second, both
    /// under the probe timeout.
    pub async fn probe(&self, cookie_token: Option<&str>, redirect_to: Option<&str>) -> ProbeOutcome {
        let target = sanitize_target(redirect_to);

        // Only a store-backed marker wins without a remote round-trip. A
        // cookie the store does not recognize goes through the provider
        // check below, so a stale cookie can never bounce straight back to
        // the admin area.
        if let Some(token) = cookie_token {
            if self.tokens.contains(token).await {
                debug!("Session marker present, skipping provider probe");
                return ProbeOutcome::Redirect { to: target, issued: None };
            }
        }

        match timeout(SESSION_PROBE_TIMEOUT, self.gateway.current_session()).await {
            Ok(Ok(Some(session))) => {
                info!("Restored identity session for {}", session.email);
                let issued = self.tokens.set(IssuedVia::Restored).await;
                ProbeOutcome::Redirect {
                    to: target,
                    issued: Some(issued),
                }
            }
            Ok(Ok(None)) => ProbeOutcome::Form { notice: None },
            Ok(Err(err)) => ProbeOutcome::Form {
                notice: Some(format!("Authentication check failed: {err}. Please log in.")),
            },
            Err(_elapsed) => ProbeOutcome::Form {
                notice: Some(format!(
                    "{}, continue to log in.",
                    AuthError::SessionCheckTimeout
                )),
            },
        }
    }

    /// `Submitting`: exchange credentials, then write the marker to both
    /// locations. The caller sets the returned token's cookie and redirects.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for rejected or malformed credentials,
    /// `Network` when the provider is unreachable.
    pub async fn submit(&self, email: &str, password: &str) -> Result<SessionToken, AuthError> {
        let email = normalize_email(email);
        if !valid_email(&email) || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.gateway.sign_in(&email, password).await?;
        info!("Signed in {}", session.email);

        Ok(self.tokens.set(IssuedVia::Password).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::gateway::{IdentitySession, IdentityUser};
    use async_trait::async_trait;
    use std::env;

    struct MockGateway {
        session: Option<IdentitySession>,
        fail: bool,
        delay: Option<Duration>,
    }

    impl MockGateway {
        fn without_session() -> Self {
            Self {
                session: None,
                fail: false,
                delay: None,
            }
        }

        fn with_session(email: &str) -> Self {
            Self {
                session: Some(IdentitySession {
                    email: email.to_string(),
                }),
                fail: false,
                delay: None,
            }
        }
    }

    #[async_trait]
    impl AuthGateway for MockGateway {
        async fn sign_in(&self, email: &str, _password: &str) -> Result<IdentitySession, AuthError> {
            if self.fail {
                return Err(AuthError::InvalidCredentials);
            }
            Ok(IdentitySession {
                email: email.to_string(),
            })
        }

        async fn sign_out(&self) {}

        async fn current_session(&self) -> Result<Option<IdentitySession>, AuthError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(AuthError::Network("provider unreachable".to_string()));
            }
            Ok(self.session.clone())
        }

        async fn current_user(&self) -> Result<Option<IdentityUser>, AuthError> {
            match self.current_session().await? {
                Some(session) => Ok(Some(IdentityUser {
                    email: session.email,
                })),
                None => Ok(None),
            }
        }
    }

    fn temp_tokens() -> SessionTokenStore {
        SessionTokenStore::new(
            env::temp_dir()
                .join(format!("vetrina-login-{}", uuid::Uuid::new_v4()))
                .join("sessions.json"),
        )
    }

    #[test]
    fn sanitize_target_defaults_to_dashboard() {
        assert_eq!(sanitize_target(None), ADMIN_HOME);
        assert_eq!(sanitize_target(Some("")), ADMIN_HOME);
    }

    #[test]
    fn sanitize_target_keeps_local_paths() {
        assert_eq!(sanitize_target(Some("/admin/jobs")), "/admin/jobs");
    }

    #[test]
    fn sanitize_target_rejects_external_urls() {
        assert_eq!(sanitize_target(Some("https://example.com")), ADMIN_HOME);
        assert_eq!(sanitize_target(Some("//example.com")), ADMIN_HOME);
    }

    #[test]
    fn sanitize_target_breaks_nested_redirect_loops() {
        assert_eq!(
            sanitize_target(Some("/admin/jobs?redirectTo=%2Fadmin%2Fjobs")),
            ADMIN_HOME
        );
    }

    #[tokio::test]
    async fn probe_redirects_when_marker_already_present() {
        let tokens = temp_tokens();
        let issued = tokens.set(IssuedVia::Password).await;
        let gateway = MockGateway::without_session();
        let flow = LoginFlow::new(&gateway, &tokens);

        let outcome = flow.probe(Some(issued.value()), Some("/admin/jobs")).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Redirect {
                to: "/admin/jobs".to_string(),
                issued: None
            }
        );
    }

    #[tokio::test]
    async fn probe_restores_session_and_writes_marker() {
        let tokens = temp_tokens();
        let gateway = MockGateway::with_session("admin@elextrio.com");
        let flow = LoginFlow::new(&gateway, &tokens);

        let outcome = flow.probe(None, None).await;
        let ProbeOutcome::Redirect { to, issued } = outcome else {
            panic!("expected redirect");
        };
        assert_eq!(to, ADMIN_HOME);
        let issued = issued.expect("marker issued");
        assert_eq!(issued.issued_via, IssuedVia::Restored);
        assert!(tokens.contains(issued.value()).await);
    }

    #[tokio::test]
    async fn probe_ignores_a_cookie_the_store_does_not_back() {
        let tokens = temp_tokens();
        let gateway = MockGateway::without_session();
        let flow = LoginFlow::new(&gateway, &tokens);

        // Stale cookie, no provider session: the form must render instead
        // of redirecting back into the admin area.
        let outcome = flow
            .probe(Some("01STALESTALESTALESTALESTALE"), Some("/admin/dashboard"))
            .await;
        assert_eq!(outcome, ProbeOutcome::Form { notice: None });
    }

    #[tokio::test]
    async fn probe_renders_form_when_unauthenticated() {
        let tokens = temp_tokens();
        let gateway = MockGateway::without_session();
        let flow = LoginFlow::new(&gateway, &tokens);

        assert_eq!(
            flow.probe(None, None).await,
            ProbeOutcome::Form { notice: None }
        );
    }

    #[tokio::test]
    async fn probe_surfaces_gateway_failures_as_notice() {
        let tokens = temp_tokens();
        let mut gateway = MockGateway::without_session();
        gateway.fail = true;
        let flow = LoginFlow::new(&gateway, &tokens);

        let ProbeOutcome::Form { notice } = flow.probe(None, None).await else {
            panic!("expected form");
        };
        assert!(notice.unwrap().contains("Authentication check failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn probe_times_out_into_the_form() {
        let tokens = temp_tokens();
        let mut gateway = MockGateway::without_session();
        gateway.delay = Some(Duration::from_secs(30));
        let flow = LoginFlow::new(&gateway, &tokens);

        let ProbeOutcome::Form { notice } = flow.probe(None, None).await else {
            panic!("expected form");
        };
        assert!(notice.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn submit_success_writes_marker() {
        let tokens = temp_tokens();
        let gateway = MockGateway::without_session();
        let flow = LoginFlow::new(&gateway, &tokens);

        let token = flow
            .submit("Admin@Elextrio.com", "correct-horse")
            .await
            .unwrap();
        assert_eq!(token.issued_via, IssuedVia::Password);
        assert!(tokens.contains(token.value()).await);
    }

    #[tokio::test]
    async fn submit_rejects_bad_credentials_without_marker() {
        let tokens = temp_tokens();
        let mut gateway = MockGateway::without_session();
        gateway.fail = true;
        let flow = LoginFlow::new(&gateway, &tokens);

        let result = flow.submit("admin@elextrio.com", "wrong").await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn submit_rejects_malformed_email_locally() {
        let tokens = temp_tokens();
        let gateway = MockGateway::without_session();
        let flow = LoginFlow::new(&gateway, &tokens);

        let result = flow.submit("not-an-email", "password").await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }
}
