//! Read-only access to bookmark data.
//!
//! The pipeline only ever reads: tagged URIs, keyword records, item
//! metadata, favicon bytes. Mutation stays with whatever owns the
//! underlying store.

mod favicon;
mod file;
mod memory;

pub use favicon::FaviconClient;
pub use file::load_bookmarks_file;
pub use memory::MemoryBookmarkStore;

use async_trait::async_trait;

use crate::models::{BookmarkItem, KeywordRecord};

/// Annotation name under which bookmark descriptions are stored.
pub const DESCRIPTION_ANNOTATION: &str = "description";

/// Result type for store lookups.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by bookmark store lookups.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid bookmarks data: {0}")]
    Parse(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Favicon bytes together with their MIME type.
///
/// Zero-length bytes mean the store has no icon for the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FaviconData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FaviconData {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Data for a page with no stored icon.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Lookups the resolution pipeline performs against a bookmark store.
///
/// Implementations must tolerate concurrent calls; the pipeline fans out
/// one lookup chain per tagged URI.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// URIs of every bookmark carrying `tag`, each listed at most once.
    ///
    /// Order is the store's own; the pipeline re-sorts results by title.
    async fn uris_for_tag(&self, tag: &str) -> StoreResult<Vec<String>>;

    /// The keyword record registered for `uri`, if any.
    async fn keyword_for_uri(&self, uri: &str) -> StoreResult<Option<KeywordRecord>>;

    /// Every store item pointing at `uri`, bookmarks and otherwise.
    async fn bookmark_items_for_uri(&self, uri: &str) -> StoreResult<Vec<BookmarkItem>>;

    /// Title of the item with `id`. Unknown ids are a backend error.
    async fn item_title(&self, id: i64) -> StoreResult<String>;

    /// Value of the named annotation on `id`, if one is set.
    async fn item_annotation(&self, id: i64, name: &str) -> StoreResult<Option<String>>;

    /// Favicon for `page_url`. Returns [`FaviconData::missing`] rather than
    /// an error when the store simply has no icon.
    async fn favicon_data(&self, page_url: &str) -> StoreResult<FaviconData>;
}
