//! Flat-file content override store.
//!
//! One JSON document (`{"contents": [...]}`) holds every override entry,
//! addressed by `contentId`. Writes are read-modify-write over the whole
//! document; concurrent admin edits are last-write-wins, accepted for a
//! single-admin audience. The `text` field is coerced to a list at this
//! boundary so read sites never see a bare string.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use utoipa::ToSchema;

/// One CMS-overridable unit of text/image keyed by a stable identifier.
///
/// `text` is ordered: the first element is the primary text (titles), later
/// elements are paragraphs or lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub content_id: String,
    #[serde(deserialize_with = "string_or_seq")]
    pub text: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Accept both `"text": "one line"` and `"text": ["many", "lines"]`.
/// Coercion happens once here, never at read sites.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextField {
        One(String),
        Many(Vec<String>),
    }

    match TextField::deserialize(deserializer)? {
        TextField::One(line) => Ok(vec![line]),
        TextField::Many(lines) => Ok(lines),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ContentDocument {
    contents: Vec<ContentEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentStoreError {
    /// Document missing or unreadable.
    Read(String),
    /// Document present but not valid JSON of the expected shape.
    Malformed(String),
    /// Writing the document back failed.
    Write(String),
    /// Entry rejected at the write path (empty id or empty text list).
    InvalidEntry(String),
}

impl fmt::Display for ContentStoreError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentStoreError::Read(message) => {
                write!(formatter, "Failed to load content: {message}")
            }
            ContentStoreError::Malformed(message) => {
                write!(formatter, "Content document is malformed: {message}")
            }
            ContentStoreError::Write(message) => {
                write!(formatter, "Failed to save content: {message}")
            }
            ContentStoreError::InvalidEntry(message) => {
                write!(formatter, "Invalid content entry: {message}")
            }
        }
    }
}

impl std::error::Error for ContentStoreError {}

#[derive(Clone, Debug)]
pub struct ContentStore {
    path: Arc<PathBuf>,
}

impl ContentStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
        }
    }

    /// Read and parse the whole document.
    ///
    /// # Errors
    ///
    /// `Read` when the document is missing or unreadable, `Malformed` when
    /// it does not parse.
    pub async fn list_all(&self) -> Result<Vec<ContentEntry>, ContentStoreError> {
        let raw = tokio::fs::read_to_string(self.path.as_ref())
            .await
            .map_err(|err| ContentStoreError::Read(err.to_string()))?;

        let document: ContentDocument =
            serde_json::from_str(&raw).map_err(|err| ContentStoreError::Malformed(err.to_string()))?;

        Ok(document.contents)
    }

    /// Replace the entry matching `content_id`, or append when absent. The
    /// write replaces the full entry; entries are never partially merged.
    ///
    /// # Errors
    ///
    /// `InvalidEntry` for an empty id or empty text list, `Malformed` for an
    /// unparseable document, `Write` when persisting fails.
    pub async fn upsert(&self, entry: ContentEntry) -> Result<ContentEntry, ContentStoreError> {
        if entry.content_id.trim().is_empty() {
            return Err(ContentStoreError::InvalidEntry(
                "contentId must not be empty".to_string(),
            ));
        }
        if entry.text.is_empty() {
            return Err(ContentStoreError::InvalidEntry(
                "text must contain at least one line".to_string(),
            ));
        }

        let mut document = self.load_or_default().await?;
        match document
            .contents
            .iter_mut()
            .find(|existing| existing.content_id == entry.content_id)
        {
            Some(existing) => *existing = entry.clone(),
            None => document.contents.push(entry.clone()),
        }

        self.persist(&document).await?;
        Ok(entry)
    }

    /// Remove the entry matching `content_id`. Removing an absent id is not
    /// an error; the document is written back unchanged.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ContentStore::upsert`].
    pub async fn remove(&self, content_id: &str) -> Result<(), ContentStoreError> {
        let mut document = self.load_or_default().await?;
        document
            .contents
            .retain(|entry| entry.content_id != content_id);
        self.persist(&document).await
    }

    /// A missing document is an empty one on the write path, so the first
    /// upsert creates the file. Malformed content still errors: overwriting
    /// a document we cannot parse would destroy entries.
    async fn load_or_default(&self) -> Result<ContentDocument, ContentStoreError> {
        match tokio::fs::read_to_string(self.path.as_ref()).await {
            Ok(raw) => {
                serde_json::from_str(&raw).map_err(|err| ContentStoreError::Malformed(err.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(ContentDocument::default())
            }
            Err(err) => Err(ContentStoreError::Read(err.to_string())),
        }
    }

    async fn persist(&self, document: &ContentDocument) -> Result<(), ContentStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| ContentStoreError::Write(err.to_string()))?;
        }

        let serialized = serde_json::to_string_pretty(document)
            .map_err(|err| ContentStoreError::Write(err.to_string()))?;

        tokio::fs::write(self.path.as_ref(), serialized)
            .await
            .map_err(|err| ContentStoreError::Write(err.to_string()))
    }
}
