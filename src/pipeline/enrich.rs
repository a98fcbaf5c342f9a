//! Favicon enrichment.
//!
//! Replaces each engine's default icon with a data URI built from the
//! store's favicon bytes. Engines whose favicon cannot be produced keep
//! the default icon.

use std::sync::OnceLock;

use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::models::BookmarkEngine;
use crate::pipeline::PipelineEvent;
use crate::store::{BookmarkStore, FaviconData};

/// Default icon data URI (built once, shared by every engine that needs it).
static DEFAULT_FAVICON_URI: OnceLock<String> = OnceLock::new();

/// Generic magnifying-glass icon for engines without a stored favicon.
const DEFAULT_FAVICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16"><circle cx="6.5" cy="6.5" r="4.75" fill="none" stroke="#5b5b66" stroke-width="1.5"/><path d="m10.3 10.3 3.7 3.7" fill="none" stroke="#5b5b66" stroke-width="1.5" stroke-linecap="round"/></svg>"##;

/// Data URI of the default engine icon.
pub fn default_favicon_uri() -> &'static str {
    DEFAULT_FAVICON_URI.get_or_init(|| {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(DEFAULT_FAVICON_SVG);
        format!("data:image/svg+xml;base64,{}", encoded)
    })
}

/// Attach stored favicons to `engines`, keeping input order.
///
/// Every lookup runs to completion; a failed fetch costs one icon, not
/// the run. The fallback count lands in [`PipelineEvent::EnrichCompleted`].
pub(crate) async fn enrich_engines(
    store: &dyn BookmarkStore,
    engines: Vec<BookmarkEngine>,
    event_tx: &mpsc::Sender<PipelineEvent>,
) -> Vec<BookmarkEngine> {
    let _ = event_tx
        .send(PipelineEvent::EnrichStarted {
            total_engines: engines.len(),
        })
        .await;

    let futures: Vec<_> = engines
        .iter()
        .map(|engine| store.favicon_data(engine.page_url()))
        .collect();
    let results = join_all(futures).await;

    let mut updated = 0;
    let mut fallbacks = 0;
    let mut enriched = Vec::with_capacity(results.len());
    for (mut engine, result) in engines.into_iter().zip(results) {
        match result {
            Ok(data) if !data.is_empty() => {
                engine.favicon_uri = favicon_data_uri(&data);
                updated += 1;
            }
            Ok(_) => {
                debug!("No stored favicon for {}", engine.page_url());
                fallbacks += 1;
            }
            Err(e) => {
                warn!("Favicon lookup failed for {}: {}", engine.page_url(), e);
                fallbacks += 1;
            }
        }
        enriched.push(engine);
    }

    let _ = event_tx
        .send(PipelineEvent::EnrichCompleted {
            enriched: updated,
            fallbacks,
        })
        .await;

    enriched
}

/// Encode favicon bytes as a data URI.
fn favicon_data_uri(data: &FaviconData) -> String {
    use base64::Engine;

    let mime = if data.mime_type.is_empty() {
        "image/x-icon"
    } else {
        data.mime_type.as_str()
    };
    let encoded = base64::engine::general_purpose::STANDARD.encode(&data.bytes);
    format!("data:{};base64,{}", mime, encoded)
}
