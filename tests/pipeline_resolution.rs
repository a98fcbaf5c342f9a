//! End-to-end pipeline tests.
//!
//! Runs the full tag-to-engines pipeline against in-memory stores and
//! checks the properties that matter to callers: which bookmarks become
//! engines, result ordering, failure isolation, and event sequencing.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use searchmarks::models::{BookmarkItem, KeywordRecord};
use searchmarks::pipeline::default_favicon_uri;
use searchmarks::store::{FaviconData, StoreError, StoreResult};
use searchmarks::{
    BookmarkStore, Engine, MemoryBookmarkStore, PipelineEvent, SearchPipeline, SearchSession,
};

/// A store with two search engines, a plain shortcut, a keywordless
/// bookmark, and a folder-only URI under the "search" tag.
fn mixed_store() -> MemoryBookmarkStore {
    let mut store = MemoryBookmarkStore::new();

    store.insert_bookmark(1, "Wikipedia", "https://en.wikipedia.org/wiki/Special:Search?search=%s");
    store.tag_uri("search", "https://en.wikipedia.org/wiki/Special:Search?search=%s");
    store.set_keyword(KeywordRecord {
        keyword: "wp".to_string(),
        url: "https://en.wikipedia.org/wiki/Special:Search?search=%s".to_string(),
        post_data: None,
    });
    store.set_annotation(1, "description", "Search Wikipedia");

    store.insert_bookmark(2, "Bug tracker", "https://bugs.example/query");
    store.tag_uri("search", "https://bugs.example/query");
    store.set_keyword(KeywordRecord {
        keyword: "bug".to_string(),
        url: "https://bugs.example/query".to_string(),
        post_data: Some("id=%25s".to_string()),
    });

    // Keyword without a marker: a shortcut, not an engine.
    store.insert_bookmark(3, "Front page", "https://news.example/");
    store.tag_uri("search", "https://news.example/");
    store.set_keyword(KeywordRecord {
        keyword: "news".to_string(),
        url: "https://news.example/".to_string(),
        post_data: None,
    });

    // Tagged but keywordless.
    store.insert_bookmark(4, "Docs", "https://docs.example/");
    store.tag_uri("search", "https://docs.example/");

    // Tagged URI whose only item is a folder.
    store.insert_item(BookmarkItem::folder(5), "https://folder.example/?q=%s");
    store.tag_uri("search", "https://folder.example/?q=%s");
    store.set_keyword(KeywordRecord {
        keyword: "fold".to_string(),
        url: "https://folder.example/?q=%s".to_string(),
        post_data: None,
    });

    store
}

#[tokio::test]
async fn only_qualifying_bookmarks_become_engines() {
    let pipeline = SearchPipeline::new(Arc::new(mixed_store()), "search");
    let engines = pipeline.engines().await;

    let titles: Vec<_> = engines.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Bug tracker", "Wikipedia"]);
    assert_eq!(engines[1].description, "Search Wikipedia");
    assert_eq!(engines[1].keyword, "wp");
}

#[tokio::test]
async fn get_and_post_submissions_come_out_ready_to_send() {
    let pipeline = SearchPipeline::new(Arc::new(mixed_store()), "search");
    let engines = pipeline.engines().await;

    let wikipedia = engines.iter().find(|e| e.keyword == "wp").unwrap();
    let submission = wikipedia.template.submission("hello world").unwrap();
    assert_eq!(
        submission.uri.as_str(),
        "https://en.wikipedia.org/wiki/Special:Search?search=hello+world"
    );
    assert!(submission.post_body.is_none());

    let bugs = engines.iter().find(|e| e.keyword == "bug").unwrap();
    let submission = bugs.template.submission("1234").unwrap();
    assert_eq!(submission.uri.as_str(), "https://bugs.example/query");
    let post = submission.post_body.unwrap();
    assert_eq!(post.bytes, b"id=1234");
    assert_eq!(post.content_type, "application/x-www-form-urlencoded");
}

#[tokio::test]
async fn unenriched_engines_share_the_default_favicon() {
    let pipeline = SearchPipeline::new(Arc::new(mixed_store()), "search");
    let engines = pipeline.engines().await;

    for engine in &engines {
        assert_eq!(engine.favicon_uri, default_favicon_uri());
    }
}

#[tokio::test]
async fn stored_favicons_survive_the_whole_pipeline() {
    let mut store = mixed_store();
    store.set_favicon(
        "https://en.wikipedia.org/wiki/Special:Search?search=%s",
        FaviconData::new("image/png", vec![0x89, 0x50, 0x4e, 0x47]),
    );

    let pipeline = SearchPipeline::new(Arc::new(store), "search");
    let engines = pipeline.engines().await;

    let wikipedia = engines.iter().find(|e| e.keyword == "wp").unwrap();
    assert!(wikipedia.favicon_uri.starts_with("data:image/png;base64,"));

    let bugs = engines.iter().find(|e| e.keyword == "bug").unwrap();
    assert_eq!(bugs.favicon_uri, default_favicon_uri());
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let pipeline = SearchPipeline::new(Arc::new(mixed_store()), "search");
    let first = pipeline.engines().await;
    let second = pipeline.engines().await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_tag_resolves_to_nothing() {
    let pipeline = SearchPipeline::new(Arc::new(mixed_store()), "bookmarks");
    assert!(pipeline.engines().await.is_empty());
}

/// Delegates to a memory store but fails lookups for selected URIs or
/// favicon pages.
struct FailingStore {
    inner: MemoryBookmarkStore,
    fail_keywords: BTreeSet<String>,
    fail_favicons: BTreeSet<String>,
}

impl FailingStore {
    fn new(inner: MemoryBookmarkStore) -> Self {
        Self {
            inner,
            fail_keywords: BTreeSet::new(),
            fail_favicons: BTreeSet::new(),
        }
    }
}

#[async_trait]
impl BookmarkStore for FailingStore {
    async fn uris_for_tag(&self, tag: &str) -> StoreResult<Vec<String>> {
        self.inner.uris_for_tag(tag).await
    }

    async fn keyword_for_uri(&self, uri: &str) -> StoreResult<Option<KeywordRecord>> {
        if self.fail_keywords.contains(uri) {
            return Err(StoreError::Backend("lookup failed".to_string()));
        }
        self.inner.keyword_for_uri(uri).await
    }

    async fn bookmark_items_for_uri(&self, uri: &str) -> StoreResult<Vec<BookmarkItem>> {
        self.inner.bookmark_items_for_uri(uri).await
    }

    async fn item_title(&self, id: i64) -> StoreResult<String> {
        self.inner.item_title(id).await
    }

    async fn item_annotation(&self, id: i64, name: &str) -> StoreResult<Option<String>> {
        self.inner.item_annotation(id, name).await
    }

    async fn favicon_data(&self, page_url: &str) -> StoreResult<FaviconData> {
        if self.fail_favicons.contains(page_url) {
            return Err(StoreError::Backend("favicon fetch failed".to_string()));
        }
        self.inner.favicon_data(page_url).await
    }
}

#[tokio::test]
async fn a_failing_uri_costs_one_engine_not_the_run() {
    let mut store = FailingStore::new(mixed_store());
    store
        .fail_keywords
        .insert("https://en.wikipedia.org/wiki/Special:Search?search=%s".to_string());

    let pipeline = SearchPipeline::new(Arc::new(store), "search");
    let engines = pipeline.engines().await;

    let titles: Vec<_> = engines.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Bug tracker"]);
}

#[tokio::test]
async fn a_failing_favicon_costs_one_icon_not_the_run() {
    let mut inner = mixed_store();
    inner.set_favicon(
        "https://bugs.example/query",
        FaviconData::new("image/png", vec![1, 2, 3]),
    );
    let mut store = FailingStore::new(inner);
    store
        .fail_favicons
        .insert("https://en.wikipedia.org/wiki/Special:Search?search=%s".to_string());

    let pipeline = SearchPipeline::new(Arc::new(store), "search");
    let engines = pipeline.engines().await;

    assert_eq!(engines.len(), 2);
    let wikipedia = engines.iter().find(|e| e.keyword == "wp").unwrap();
    assert_eq!(wikipedia.favicon_uri, default_favicon_uri());
    let bugs = engines.iter().find(|e| e.keyword == "bug").unwrap();
    assert!(bugs.favicon_uri.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn events_arrive_in_pipeline_order() {
    let pipeline = SearchPipeline::new(Arc::new(mixed_store()), "search");

    let (event_tx, mut event_rx) = mpsc::channel(64);
    let engines = pipeline.run(event_tx).await;
    assert_eq!(engines.len(), 2);

    let mut events = Vec::new();
    while let Some(event) = event_rx.recv().await {
        events.push(event);
    }

    let position = |pred: &dyn Fn(&PipelineEvent) -> bool| {
        events.iter().position(|e| pred(e)).expect("event missing")
    };

    let resolve_started =
        position(&|e| matches!(e, PipelineEvent::ResolveStarted { total_uris: 5 }));
    let resolve_completed =
        position(&|e| matches!(e, PipelineEvent::ResolveCompleted { resolved: 2 }));
    let enrich_started =
        position(&|e| matches!(e, PipelineEvent::EnrichStarted { total_engines: 2 }));
    let ready = position(&|e| matches!(e, PipelineEvent::Ready { engines: 2 }));

    assert!(resolve_started < resolve_completed);
    assert!(resolve_completed < enrich_started);
    assert!(enrich_started < ready);

    let dropped = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::CandidateDropped { .. }))
        .count();
    assert_eq!(dropped, 3);
}

#[tokio::test]
async fn session_default_tracks_usage_across_merged_engines() {
    let pipeline = SearchPipeline::new(Arc::new(mixed_store()), "search");
    let engines: Vec<Engine> = pipeline
        .engines()
        .await
        .into_iter()
        .map(Engine::from)
        .collect();

    let mut session = SearchSession::new();
    assert_eq!(session.default_engine(&engines).unwrap().title(), "Bug tracker");

    session.note_used(&engines[1]);
    assert_eq!(session.default_engine(&engines).unwrap().title(), "Wikipedia");
}
