//! Edge route guard.
//!
//! Intercepts every request before page code runs. Only the cookie is
//! visible at this layer; the marker is not verified remotely here, that is
//! the admin shell guard's job. This layer never fails a request: the only
//! outcomes are pass-through or a redirect to the login page.

use crate::auth::token::extract_auth_token;
use crate::guard::{login_redirect_url, API_PREFIX, LOGIN_PATH, PROTECTED_PREFIX};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Redirect to the login page; `redirect_to` is omitted when the
    /// request already sits inside a redirect cycle.
    RedirectToLogin { redirect_to: Option<String> },
}

/// Pure decision function, one call per request.
#[must_use]
pub fn decide(path: &str, query: Option<&str>, has_token: bool) -> RouteDecision {
    // The login page and API routes pass unconditionally.
    if path == LOGIN_PATH || path.starts_with(API_PREFIX) {
        return RouteDecision::Allow;
    }

    if !path.starts_with(PROTECTED_PREFIX) {
        return RouteDecision::Allow;
    }

    if has_token {
        return RouteDecision::Allow;
    }

    // A redirectTo already pointing into the protected prefix means we are
    // bouncing between login and admin; drop the parameter to break the
    // cycle.
    let redirect_loop = query.is_some_and(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .any(|(key, value)| key == "redirectTo" && value.contains(PROTECTED_PREFIX))
    });

    if redirect_loop {
        RouteDecision::RedirectToLogin { redirect_to: None }
    } else {
        RouteDecision::RedirectToLogin {
            redirect_to: Some(path.to_string()),
        }
    }
}

/// Axum middleware wrapping [`decide`].
pub async fn route_guard(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(ToString::to_string);
    let has_token = extract_auth_token(request.headers()).is_some();

    match decide(&path, query.as_deref(), has_token) {
        RouteDecision::Allow => next.run(request).await,
        RouteDecision::RedirectToLogin { redirect_to } => {
            debug!("Route guard redirecting {path} to login");
            Redirect::temporary(&login_redirect_url(redirect_to.as_deref())).into_response()
        }
    }
}
