//! Admin shell guard.
//!
//! Runs on every admin page render, after the route guard already saw a
//! cookie. The local marker is only a hint; this layer corroborates it with
//! the identity provider and clears the marker when the provider no longer
//! recognizes the session, so a stale cookie cannot keep the admin area
//! open.

use crate::auth::gateway::AuthGateway;
use crate::auth::token::SessionTokenStore;
use crate::auth::AuthError;
use crate::guard::login_redirect_url;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Budget for the provider corroboration call.
pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// What the admin shell renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellState {
    /// Render the page body inside the admin chrome.
    Authenticated { email: String },
    /// No valid session: navigate to the login page, never render the body.
    Redirecting { to: String },
    /// Verification failed without a definitive answer: render the error
    /// page with retry and login escapes, never the body.
    AuthError { message: String },
}

pub struct AdminShellGuard<'a> {
    gateway: &'a dyn AuthGateway,
    tokens: &'a SessionTokenStore,
}

impl<'a> AdminShellGuard<'a> {
    #[must_use]
    pub fn new(gateway: &'a dyn AuthGateway, tokens: &'a SessionTokenStore) -> Self {
        Self { gateway, tokens }
    }

    /// Verify the session for the admin page at `path`.
    pub async fn verify(&self, cookie_token: Option<&str>, path: &str) -> ShellState {
        if !self.tokens.get(cookie_token).await {
            return ShellState::Redirecting {
                to: login_redirect_url(Some(path)),
            };
        }

        match timeout(VERIFY_TIMEOUT, self.gateway.current_user()).await {
            Ok(Ok(Some(user))) => ShellState::Authenticated { email: user.email },
            Ok(Ok(None)) => {
                // Marker and provider disagree; the provider wins.
                info!("{}, clearing the local marker", AuthError::SessionMismatch);
                self.tokens.clear(cookie_token).await;
                ShellState::Redirecting {
                    to: login_redirect_url(Some(path)),
                }
            }
            Ok(Err(err)) => {
                warn!("Session verification failed: {err}");
                self.tokens.clear(cookie_token).await;
                ShellState::AuthError {
                    message: format!("Session verification failed: {err}"),
                }
            }
            Err(_elapsed) => ShellState::AuthError {
                message: format!("{}. Please try again.", AuthError::SessionCheckTimeout),
            },
        }
    }
}
