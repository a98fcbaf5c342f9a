//! Per-URI resolution of tagged bookmarks into engines.

use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::models::BookmarkEngine;
use crate::pipeline::{enrich, PipelineEvent};
use crate::store::{BookmarkStore, StoreError, DESCRIPTION_ANNOTATION};
use crate::template::SearchTemplate;

/// Why a tagged URI did not produce an engine.
enum Skip {
    NoKeyword,
    NoMarker,
    NoBookmarkItem,
}

impl Skip {
    fn reason(&self) -> &'static str {
        match self {
            Skip::NoKeyword => "no keyword registered",
            Skip::NoMarker => "keyword has no substitution marker",
            Skip::NoBookmarkItem => "no bookmark item points at this URI",
        }
    }
}

enum Resolution {
    Engine(Box<BookmarkEngine>),
    Skipped(Skip),
}

/// Resolve every URI tagged `tag` into a [`BookmarkEngine`].
///
/// Engines come back in tagged-URI order. URIs that fail or do not
/// qualify are reported as [`PipelineEvent::CandidateDropped`] and left
/// out; a failure to list the tag itself yields an empty result.
pub(crate) async fn resolve_tag(
    store: &dyn BookmarkStore,
    tag: &str,
    event_tx: &mpsc::Sender<PipelineEvent>,
) -> Vec<BookmarkEngine> {
    let uris = match store.uris_for_tag(tag).await {
        Ok(uris) => uris,
        Err(e) => {
            warn!("Failed to list bookmarks tagged {:?}: {}", tag, e);
            let _ = event_tx
                .send(PipelineEvent::ResolveCompleted { resolved: 0 })
                .await;
            return Vec::new();
        }
    };

    let _ = event_tx
        .send(PipelineEvent::ResolveStarted {
            total_uris: uris.len(),
        })
        .await;

    // Each URI resolves independently; one failure never hides the rest.
    let futures: Vec<_> = uris.iter().map(|uri| resolve_uri(store, uri)).collect();
    let results = join_all(futures).await;

    let mut engines = Vec::new();
    for (uri, result) in uris.iter().zip(results) {
        match result {
            Ok(Resolution::Engine(engine)) => engines.push(*engine),
            Ok(Resolution::Skipped(skip)) => {
                debug!("Skipping {}: {}", uri, skip.reason());
                let _ = event_tx
                    .send(PipelineEvent::CandidateDropped {
                        uri: uri.clone(),
                        reason: skip.reason().to_string(),
                    })
                    .await;
            }
            Err(e) => {
                warn!("Failed to resolve {}: {}", uri, e);
                let _ = event_tx
                    .send(PipelineEvent::CandidateDropped {
                        uri: uri.clone(),
                        reason: e.to_string(),
                    })
                    .await;
            }
        }
    }

    let _ = event_tx
        .send(PipelineEvent::ResolveCompleted {
            resolved: engines.len(),
        })
        .await;

    engines
}

/// Resolve one tagged URI: keyword record, template, owning bookmark
/// item, title, description.
async fn resolve_uri(store: &dyn BookmarkStore, uri: &str) -> Result<Resolution, StoreError> {
    let record = match store.keyword_for_uri(uri).await? {
        Some(record) => record,
        None => return Ok(Resolution::Skipped(Skip::NoKeyword)),
    };

    let template = match SearchTemplate::from_keyword_record(&record) {
        Some(template) => template,
        None => return Ok(Resolution::Skipped(Skip::NoMarker)),
    };

    let items = store.bookmark_items_for_uri(uri).await?;
    // Several bookmarks can share one URI; the lowest id wins so reruns
    // pick the same one.
    let id = match items
        .iter()
        .filter(|item| item.is_bookmark())
        .map(|item| item.id)
        .min()
    {
        Some(id) => id,
        None => return Ok(Resolution::Skipped(Skip::NoBookmarkItem)),
    };

    let title = store.item_title(id).await?;

    // Missing descriptions are normal; lookup errors degrade the same way.
    let description = match store.item_annotation(id, DESCRIPTION_ANNOTATION).await {
        Ok(Some(value)) => value,
        Ok(None) => String::new(),
        Err(e) => {
            debug!("No description for item {}: {}", id, e);
            String::new()
        }
    };

    let engine = BookmarkEngine::new(
        id,
        title,
        record.keyword.clone(),
        template,
        enrich::default_favicon_uri(),
    )
    .with_description(description);

    Ok(Resolution::Engine(Box::new(engine)))
}
