use axum::{
    http::{header::SET_COOKIE, HeaderValue},
    response::Response,
};

pub mod admin;
pub mod content;
pub mod health;
pub mod login;
pub mod pages;

/// Attach a `Set-Cookie` value to a finished response.
pub(crate) fn append_cookie(response: &mut Response, cookie: &str) {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
}
