//! Page-scoped content lookup.
//!
//! A provider loads the override document once per page render and answers
//! lookups against that snapshot, so a page never mixes two generations of
//! content. Every caller supplies its own hardcoded default; the override is
//! purely additive and never required for the page to render.

use crate::content::store::{ContentEntry, ContentStore};
use std::collections::HashMap;
use tracing::warn;

pub struct ContentProvider {
    entries: HashMap<String, ContentEntry>,
    error: Option<String>,
}

impl ContentProvider {
    /// Load the full override document. Failures degrade to an empty
    /// snapshot: public pages render their defaults, the admin editor shows
    /// the retained error as a banner.
    pub async fn load(store: &ContentStore) -> Self {
        match store.list_all().await {
            Ok(list) => Self {
                entries: list
                    .into_iter()
                    .map(|entry| (entry.content_id.clone(), entry))
                    .collect(),
                error: None,
            },
            Err(err) => {
                warn!("Content overrides unavailable, serving defaults: {err}");
                Self {
                    entries: HashMap::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    #[must_use]
    pub fn from_entries(entries: Vec<ContentEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.content_id.clone(), entry))
                .collect(),
            error: None,
        }
    }

    /// Load error, if any. Only the admin editor surfaces this.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// First text line of the entry, or the caller's default.
    #[must_use]
    pub fn content_text(&self, content_id: &str, default: &str) -> String {
        self.entries
            .get(content_id)
            .and_then(|entry| entry.text.first())
            .map_or_else(|| default.to_string(), ToString::to_string)
    }

    /// Full text list of the entry, or the caller's default.
    #[must_use]
    pub fn content_array(&self, content_id: &str, default: &[&str]) -> Vec<String> {
        self.entries.get(content_id).map_or_else(
            || default.iter().map(ToString::to_string).collect(),
            |entry| entry.text.clone(),
        )
    }

    /// Image URL of the entry when present and non-empty, else the default.
    #[must_use]
    pub fn content_image(&self, content_id: &str, default: Option<&str>) -> Option<String> {
        match self.entries.get(content_id).and_then(|entry| entry.image.as_deref()) {
            Some(image) if !image.is_empty() => Some(image.to_string()),
            _ => default.map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn provider() -> ContentProvider {
        ContentProvider::from_entries(vec![
            ContentEntry {
                content_id: "about-hero-heading".to_string(),
                text: vec!["New Heading".to_string(), "Second line".to_string()],
                image: Some("/images/hero.jpg".to_string()),
            },
            ContentEntry {
                content_id: "about-empty-image".to_string(),
                text: vec!["Line".to_string()],
                image: Some(String::new()),
            },
        ])
    }

    #[test]
    fn content_text_returns_first_line() {
        assert_eq!(
            provider().content_text("about-hero-heading", "About Elextrio"),
            "New Heading"
        );
    }

    #[test]
    fn content_text_falls_back_to_default() {
        assert_eq!(
            provider().content_text("missing-id", "About Elextrio"),
            "About Elextrio"
        );
    }

    #[test]
    fn content_array_returns_all_lines_or_default() {
        let provider = provider();
        assert_eq!(
            provider.content_array("about-hero-heading", &[]),
            vec!["New Heading", "Second line"]
        );
        assert_eq!(
            provider.content_array("missing-id", &["a", "b"]),
            vec!["a", "b"]
        );
    }

    #[test]
    fn content_image_ignores_empty_override() {
        let provider = provider();
        assert_eq!(
            provider.content_image("about-hero-heading", None),
            Some("/images/hero.jpg".to_string())
        );
        assert_eq!(
            provider.content_image("about-empty-image", Some("/images/default.jpg")),
            Some("/images/default.jpg".to_string())
        );
        assert_eq!(provider.content_image("missing-id", None), None);
    }

    #[tokio::test]
    async fn load_degrades_to_defaults_on_read_failure() {
        let store = ContentStore::new(
            env::temp_dir().join(format!("vetrina-missing-{}", uuid::Uuid::new_v4())),
        );
        let provider = ContentProvider::load(&store).await;

        assert!(provider.error().is_some());
        assert_eq!(provider.content_text("any", "default copy"), "default copy");
    }
}
