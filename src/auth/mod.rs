pub mod gateway;
pub mod token;

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Errors surfaced by the auth gateway and the two guards.
///
/// Every variant is recovered into a visible UI state; none of these
/// propagate as unhandled errors past a handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Sign-in rejected by the identity provider; shown inline on the form.
    InvalidCredentials,
    /// Transport-level failure talking to the identity provider.
    Network(String),
    /// Session verification exceeded its timeout budget.
    SessionCheckTimeout,
    /// Local token present but the provider no longer has a session.
    SessionMismatch,
}

impl fmt::Display for AuthError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => {
                write!(formatter, "Invalid email or password")
            }
            AuthError::Network(message) => write!(formatter, "Network error: {message}"),
            AuthError::SessionCheckTimeout => {
                write!(formatter, "Session check timed out")
            }
            AuthError::SessionMismatch => {
                write!(formatter, "Session no longer valid, please sign in again")
            }
        }
    }
}

impl std::error::Error for AuthError {}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
    })
}

#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}
