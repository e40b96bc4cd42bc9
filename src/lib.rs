//! # Vetrina (Elextrio site & admin gate)
//!
//! `vetrina` serves the Elextrio marketing pages and the authenticated admin
//! area behind them. It owns the two access gates and the content-override
//! store; everything else (job/project CRUD, object storage, email) lives in
//! external services.
//!
//! ## Access gates
//!
//! Exactly two gates protect `/admin/*`:
//!
//! - **Route guard** (middleware): cheap cookie-presence check before any
//!   page code runs. Redirects to `/login` with a `redirectTo` parameter and
//!   breaks nested-redirect loops.
//! - **Admin shell guard** (per page render): re-reads the session token
//!   store and corroborates it with the identity provider under a timeout.
//!   The page body is never rendered unless this guard reports
//!   `Authenticated`.
//!
//! The session marker is an opaque ULID stored redundantly in a local
//! persistent store and in the `auth_token` cookie; the cookie alone is
//! never treated as proof of identity.
//!
//! ## Content overrides
//!
//! Site copy ships with hardcoded defaults. A single JSON document maps
//! `contentId` to a list of text lines and an optional image URL; public
//! pages substitute overrides when present and silently fall back to the
//! defaults when the document is missing or malformed.

pub mod api;
pub mod auth;
pub mod cli;
pub mod content;
pub mod guard;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
