//! Redundant session marker: a local persistent store plus the `auth_token`
//! cookie. Both locations are written together on sign-in and cleared
//! together on sign-out or mismatch. The cookie carries an opaque ULID, not
//! a credential; the real trust boundary stays with the identity provider.
//!
//! The local store must never make auth fail on its own: when the backing
//! file is unavailable the failure is logged and the marker is treated as
//! absent, leaving the cookie as the only visible location.

use axum::http::{header::COOKIE, HeaderMap};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use ulid::Ulid;

pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// 30 days, matching the original cookie contract.
pub const AUTH_COOKIE_MAX_AGE_SECONDS: u64 = 60 * 60 * 24 * 30;

/// How the marker came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssuedVia {
    /// Credential sign-in through the login form.
    Password,
    /// Re-issued after the identity provider confirmed an existing session.
    Restored,
}

/// An issued session marker. The cookie string for the response is built
/// from here so both locations always agree on the value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    pub issued_via: IssuedVia,
}

impl SessionToken {
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// `Set-Cookie` value writing the marker to the cookie location.
    #[must_use]
    pub fn cookie(&self) -> String {
        format!(
            "{AUTH_COOKIE_NAME}={}; Path=/; Max-Age={AUTH_COOKIE_MAX_AGE_SECONDS}; SameSite=Lax",
            self.value
        )
    }
}

/// `Set-Cookie` value removing the marker from the cookie location.
#[must_use]
pub fn clear_cookie() -> String {
    format!("{AUTH_COOKIE_NAME}=; Path=/; Max-Age=0; SameSite=Lax")
}

/// Read the marker out of the request's `Cookie` header. This is the only
/// location the edge route guard can observe.
#[must_use]
pub fn extract_auth_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == AUTH_COOKIE_NAME && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenRecord {
    issued_via: IssuedVia,
    issued_at: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionDocument {
    tokens: HashMap<String, TokenRecord>,
}

/// The local persistent marker location, one JSON document of issued
/// tokens. Writes originate from login/logout handlers only; a concurrent
/// write race would be last-write-wins, accepted for the single-admin
/// audience.
#[derive(Clone, Debug)]
pub struct SessionTokenStore {
    path: Arc<PathBuf>,
}

impl SessionTokenStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
        }
    }

    /// Issue a new marker and write it to the local store. The caller sets
    /// the matching cookie on its response, keeping both locations in step.
    pub async fn set(&self, issued_via: IssuedVia) -> SessionToken {
        let token = SessionToken {
            value: Ulid::new().to_string(),
            issued_via,
        };

        let mut document = self.load().await;
        document.tokens.insert(
            token.value.clone(),
            TokenRecord {
                issued_via,
                issued_at: unix_now(),
            },
        );
        self.persist(&document).await;

        token
    }

    /// True when either location reports a marker: the local store is
    /// checked first, the cookie value itself is the fallback.
    pub async fn get(&self, cookie_token: Option<&str>) -> bool {
        if let Some(token) = cookie_token {
            if self.contains(token).await {
                return true;
            }
        }
        cookie_token.is_some()
    }

    /// Local-store check only.
    pub async fn contains(&self, token: &str) -> bool {
        self.load().await.tokens.contains_key(token)
    }

    /// Remove the marker from the local store. Passing `None` clears every
    /// record, used when the cookie value is unknown but auth must end.
    pub async fn clear(&self, token: Option<&str>) {
        let mut document = self.load().await;
        match token {
            Some(token) => {
                document.tokens.remove(token);
            }
            None => document.tokens.clear(),
        }
        self.persist(&document).await;
    }

    async fn load(&self) -> SessionDocument {
        let mut document = match tokio::fs::read_to_string(self.path.as_ref()).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(document) => document,
                Err(err) => {
                    warn!("Session store unreadable, treating as empty: {err}");
                    SessionDocument::default()
                }
            },
            Err(err) => {
                debug!("Session store not available yet: {err}");
                SessionDocument::default()
            }
        };

        // Markers outlive their cookie max-age only as garbage (abandoned
        // browsers, lost cookies); drop them here so the document cannot
        // grow without bound. The next write compacts the file.
        let cutoff = unix_now().saturating_sub(AUTH_COOKIE_MAX_AGE_SECONDS);
        document
            .tokens
            .retain(|_, record| record.issued_at >= cutoff);

        document
    }

    async fn persist(&self, document: &SessionDocument) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = tokio::fs::create_dir_all(parent).await {
                warn!("Session store unavailable, marker kept in cookie only: {err}");
                return;
            }
        }

        let serialized = match serde_json::to_string_pretty(document) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!("Failed to serialize session store: {err}");
                return;
            }
        };

        if let Err(err) = tokio::fs::write(self.path.as_ref(), serialized).await {
            warn!("Session store unavailable, marker kept in cookie only: {err}");
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::env;

    fn temp_store() -> SessionTokenStore {
        let path = env::temp_dir()
            .join(format!("vetrina-tokens-{}", uuid::Uuid::new_v4()))
            .join("sessions.json");
        SessionTokenStore::new(path)
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[tokio::test]
    async fn set_then_get_is_visible_from_both_locations() {
        let store = temp_store();
        let token = store.set(IssuedVia::Password).await;

        // Local-store path
        assert!(store.contains(token.value()).await);
        // Cookie-only path, as the edge guard sees it
        let headers = headers_with_cookie(&token.cookie());
        assert_eq!(extract_auth_token(&headers).as_deref(), Some(token.value()));

        assert!(store.get(Some(token.value())).await);
    }

    #[tokio::test]
    async fn clear_removes_both_locations() {
        let store = temp_store();
        let token = store.set(IssuedVia::Password).await;

        store.clear(Some(token.value())).await;
        assert!(!store.contains(token.value()).await);

        let headers = headers_with_cookie(&clear_cookie());
        assert_eq!(extract_auth_token(&headers), None);
    }

    #[tokio::test]
    async fn clear_all_empties_the_store() {
        let store = temp_store();
        let first = store.set(IssuedVia::Password).await;
        let second = store.set(IssuedVia::Restored).await;

        store.clear(None).await;
        assert!(!store.contains(first.value()).await);
        assert!(!store.contains(second.value()).await);
    }

    #[tokio::test]
    async fn unavailable_store_falls_back_to_cookie() {
        // Parent "directory" is a regular file, so every write fails.
        let blocker = env::temp_dir().join(format!("vetrina-blocked-{}", uuid::Uuid::new_v4()));
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = SessionTokenStore::new(blocker.join("sessions.json"));

        let token = store.set(IssuedVia::Password).await;
        assert!(!store.contains(token.value()).await);
        // The cookie location still reports the marker.
        assert!(store.get(Some(token.value())).await);
        // And clearing does not panic.
        store.clear(Some(token.value())).await;
    }

    #[tokio::test]
    async fn expired_markers_are_pruned() {
        let store = temp_store();
        let fresh = store.set(IssuedVia::Password).await;

        // Plant a record older than the cookie max-age next to the fresh one.
        let raw = std::fs::read_to_string(store.path.as_ref()).unwrap();
        let mut document: serde_json::Value = serde_json::from_str(&raw).unwrap();
        document["tokens"]["01ARZ3NDEKTSV4RRFFQ69G5FAV"] =
            serde_json::json!({ "issued_via": "password", "issued_at": 0 });
        std::fs::write(store.path.as_ref(), document.to_string()).unwrap();

        assert!(!store.contains("01ARZ3NDEKTSV4RRFFQ69G5FAV").await);
        assert!(store.contains(fresh.value()).await);

        // A write compacts the expired record out of the file.
        store.set(IssuedVia::Restored).await;
        let raw = std::fs::read_to_string(store.path.as_ref()).unwrap();
        assert!(!raw.contains("01ARZ3NDEKTSV4RRFFQ69G5FAV"));
        assert!(raw.contains(fresh.value()));
    }

    #[test]
    fn cookie_carries_contract_attributes() {
        let token = SessionToken {
            value: "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(),
            issued_via: IssuedVia::Password,
        };
        let cookie = token.cookie();
        assert!(cookie.starts_with("auth_token=01ARZ3NDEKTSV4RRFFQ69G5FAV;"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn extract_auth_token_handles_multiple_cookies() {
        let headers = headers_with_cookie("theme=dark; auth_token=abc123; lang=en");
        assert_eq!(extract_auth_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn extract_auth_token_ignores_empty_value() {
        let headers = headers_with_cookie("auth_token=");
        assert_eq!(extract_auth_token(&headers), None);
    }
}
