//! In-memory bookmark store.
//!
//! Holds a snapshot of bookmark data registered up front. Backs the file
//! loader and most tests; lookups never touch the network unless a
//! favicon client is attached.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use crate::models::{BookmarkItem, KeywordRecord};
use crate::store::{BookmarkStore, FaviconClient, FaviconData, StoreError, StoreResult};

/// Bookmark store backed by in-memory maps.
///
/// Populate with the `insert_*`/`set_*` methods before handing it to the
/// pipeline; lookups after that point are read-only.
#[derive(Debug, Default)]
pub struct MemoryBookmarkStore {
    tagged: BTreeMap<String, Vec<String>>,
    keywords: BTreeMap<String, KeywordRecord>,
    items: BTreeMap<String, Vec<BookmarkItem>>,
    titles: BTreeMap<i64, String>,
    annotations: BTreeMap<(i64, String), String>,
    favicons: BTreeMap<String, FaviconData>,
    favicon_client: Option<FaviconClient>,
}

impl MemoryBookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an HTTP client used when a favicon is not stored locally.
    pub fn with_favicon_client(mut self, client: FaviconClient) -> Self {
        self.favicon_client = Some(client);
        self
    }

    /// Register a bookmark item: its id, title, and the URI it points at.
    pub fn insert_bookmark(&mut self, id: i64, title: impl Into<String>, uri: impl Into<String>) {
        let uri = uri.into();
        self.items
            .entry(uri)
            .or_default()
            .push(BookmarkItem::bookmark(id));
        self.titles.insert(id, title.into());
    }

    /// Register a non-bookmark item (folder, separator) pointing at `uri`.
    pub fn insert_item(&mut self, item: BookmarkItem, uri: impl Into<String>) {
        self.items.entry(uri.into()).or_default().push(item);
    }

    /// Tag a URI. Registering the same pairing twice is a no-op.
    pub fn tag_uri(&mut self, tag: impl Into<String>, uri: impl Into<String>) {
        let uris = self.tagged.entry(tag.into()).or_default();
        let uri = uri.into();
        if !uris.contains(&uri) {
            uris.push(uri);
        }
    }

    /// Register a keyword record for its URI.
    pub fn set_keyword(&mut self, record: KeywordRecord) {
        self.keywords.insert(record.url.clone(), record);
    }

    /// Set a named annotation on an item.
    pub fn set_annotation(
        &mut self,
        id: i64,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.annotations.insert((id, name.into()), value.into());
    }

    /// Store favicon bytes for a page URL.
    pub fn set_favicon(&mut self, page_url: impl Into<String>, data: FaviconData) {
        self.favicons.insert(page_url.into(), data);
    }

    /// Number of distinct URIs with registered items.
    pub fn uri_count(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl BookmarkStore for MemoryBookmarkStore {
    async fn uris_for_tag(&self, tag: &str) -> StoreResult<Vec<String>> {
        Ok(self.tagged.get(tag).cloned().unwrap_or_default())
    }

    async fn keyword_for_uri(&self, uri: &str) -> StoreResult<Option<KeywordRecord>> {
        Ok(self.keywords.get(uri).cloned())
    }

    async fn bookmark_items_for_uri(&self, uri: &str) -> StoreResult<Vec<BookmarkItem>> {
        Ok(self.items.get(uri).cloned().unwrap_or_default())
    }

    async fn item_title(&self, id: i64) -> StoreResult<String> {
        self.titles
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::Backend(format!("no item with id {}", id)))
    }

    async fn item_annotation(&self, id: i64, name: &str) -> StoreResult<Option<String>> {
        Ok(self.annotations.get(&(id, name.to_string())).cloned())
    }

    async fn favicon_data(&self, page_url: &str) -> StoreResult<FaviconData> {
        if let Some(data) = self.favicons.get(page_url) {
            return Ok(data.clone());
        }

        if let Some(client) = &self.favicon_client {
            debug!("No stored favicon for {}, fetching", page_url);
            return client.fetch(page_url).await;
        }

        Ok(FaviconData::missing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> MemoryBookmarkStore {
        let mut store = MemoryBookmarkStore::new();
        store.insert_bookmark(1, "Wikipedia", "https://en.wikipedia.org/w/index.php?search=%s");
        store.insert_bookmark(2, "Rust docs", "https://doc.rust-lang.org/std/?search=%s");
        store.tag_uri("search", "https://en.wikipedia.org/w/index.php?search=%s");
        store.tag_uri("search", "https://doc.rust-lang.org/std/?search=%s");
        store.set_keyword(KeywordRecord {
            keyword: "wp".to_string(),
            url: "https://en.wikipedia.org/w/index.php?search=%s".to_string(),
            post_data: None,
        });
        store.set_annotation(1, "description", "Search Wikipedia");
        store
    }

    #[tokio::test]
    async fn tagged_uris_keep_registration_order() {
        let store = sample_store();
        let uris = store.uris_for_tag("search").await.unwrap();
        assert_eq!(
            uris,
            vec![
                "https://en.wikipedia.org/w/index.php?search=%s",
                "https://doc.rust-lang.org/std/?search=%s",
            ]
        );
    }

    #[tokio::test]
    async fn repeated_tagging_registers_a_uri_once() {
        let mut store = sample_store();
        store.tag_uri("search", "https://en.wikipedia.org/w/index.php?search=%s");

        let uris = store.uris_for_tag("search").await.unwrap();
        assert_eq!(
            uris,
            vec![
                "https://en.wikipedia.org/w/index.php?search=%s",
                "https://doc.rust-lang.org/std/?search=%s",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_tag_is_empty_not_an_error() {
        let store = sample_store();
        assert!(store.uris_for_tag("nonsense").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn keyword_lookup_matches_exact_uri() {
        let store = sample_store();
        let record = store
            .keyword_for_uri("https://en.wikipedia.org/w/index.php?search=%s")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.keyword, "wp");

        let none = store
            .keyword_for_uri("https://doc.rust-lang.org/std/?search=%s")
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn missing_title_is_a_backend_error() {
        let store = sample_store();
        let err = store.item_title(999).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn unset_annotation_is_none() {
        let store = sample_store();
        assert!(store
            .item_annotation(2, "description")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn missing_favicon_yields_empty_data() {
        let store = sample_store();
        let data = store
            .favicon_data("https://en.wikipedia.org/w/index.php?search=%s")
            .await
            .unwrap();
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn stored_favicon_round_trips() {
        let mut store = sample_store();
        store.set_favicon(
            "https://doc.rust-lang.org/std/?search=%s",
            FaviconData::new("image/png", vec![0x89, 0x50, 0x4e, 0x47]),
        );
        let data = store
            .favicon_data("https://doc.rust-lang.org/std/?search=%s")
            .await
            .unwrap();
        assert_eq!(data.mime_type, "image/png");
        assert_eq!(data.len(), 4);
    }
}
