//! Search engine resolution pipeline.
//!
//! Turns keyword bookmarks carrying the search tag into ready-to-use
//! engines: resolve each tagged URI to a template and its bookmark
//! metadata, enrich with favicons, sort by title.
//! Separated from UI concerns - emits events for progress tracking.

mod assemble;
mod enrich;
mod resolver;

pub use enrich::default_favicon_uri;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::models::BookmarkEngine;
use crate::store::BookmarkStore;

/// Events emitted while the pipeline runs.
/// Fields are populated when events are created, even if consumers don't read all of them.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum PipelineEvent {
    /// Tagged URIs listed, per-URI resolution starting
    ResolveStarted { total_uris: usize },
    /// A tagged URI did not become an engine
    CandidateDropped { uri: String, reason: String },
    /// Per-URI resolution finished
    ResolveCompleted { resolved: usize },
    /// Favicon enrichment starting
    EnrichStarted { total_engines: usize },
    /// Favicon enrichment finished
    EnrichCompleted { enriched: usize, fallbacks: usize },
    /// Final engine list assembled
    Ready { engines: usize },
}

/// Pipeline from tagged bookmarks to a sorted engine list.
///
/// Every run reads the store fresh; nothing about a previous run is
/// reused. The pipeline itself holds no mutable state.
pub struct SearchPipeline {
    store: Arc<dyn BookmarkStore>,
    tag: String,
}

impl SearchPipeline {
    /// Create a pipeline reading bookmarks tagged `tag` from `store`.
    pub fn new(store: Arc<dyn BookmarkStore>, tag: impl Into<String>) -> Self {
        Self {
            store,
            tag: tag.into(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Run the pipeline, emitting progress events along the way.
    ///
    /// Failures never abort a run. A URI that cannot be resolved is
    /// dropped with [`PipelineEvent::CandidateDropped`]; a favicon that
    /// cannot be fetched leaves the default icon in place. The returned
    /// engines are sorted by title, case-insensitively.
    pub async fn run(&self, event_tx: mpsc::Sender<PipelineEvent>) -> Vec<BookmarkEngine> {
        let engines = resolver::resolve_tag(self.store.as_ref(), &self.tag, &event_tx).await;
        let engines = enrich::enrich_engines(self.store.as_ref(), engines, &event_tx).await;
        let engines = assemble::sorted_by_title(engines);

        let _ = event_tx
            .send(PipelineEvent::Ready {
                engines: engines.len(),
            })
            .await;

        engines
    }

    /// Run the pipeline without observing progress events.
    pub async fn engines(&self) -> Vec<BookmarkEngine> {
        let (event_tx, event_rx) = mpsc::channel(16);
        drop(event_rx);
        self.run(event_tx).await
    }
}
