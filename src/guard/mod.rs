//! The two access gates in front of the admin area.
//!
//! The route guard is the cheap edge check (cookie presence only); the
//! admin shell guard corroborates the marker with the identity provider
//! before any admin page body renders. The login flow is the only path that
//! establishes a new session.

pub mod admin_shell;
pub mod login_flow;
pub mod route;

/// Path prefix behind both gates.
pub const PROTECTED_PREFIX: &str = "/admin";

/// The login page, always reachable.
pub const LOGIN_PATH: &str = "/login";

/// API routes bypass the route guard; the content API is its own surface.
pub const API_PREFIX: &str = "/api/";

/// Default landing page after sign-in, also the loop-break target.
pub const ADMIN_HOME: &str = "/admin/dashboard";

/// Login URL carrying the original path, URL-encoded, so the login flow can
/// return the user where they started.
#[must_use]
pub fn login_redirect_url(redirect_to: Option<&str>) -> String {
    match redirect_to {
        Some(path) => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("redirectTo", path)
                .finish();
            format!("{LOGIN_PATH}?{query}")
        }
        None => LOGIN_PATH.to_string(),
    }
}
