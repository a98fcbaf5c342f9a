//! Shared helper functions for CLI commands.

use std::sync::Arc;

use console::style;
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::models::Engine;
use crate::pipeline::{PipelineEvent, SearchPipeline};
use crate::store::{load_bookmarks_file, FaviconClient, MemoryBookmarkStore};

/// Load the bookmark store, or `None` with a notice when no bookmarks
/// file exists yet.
pub async fn load_store(settings: &Settings) -> anyhow::Result<Option<MemoryBookmarkStore>> {
    let path = settings.bookmarks_path();
    if !path.exists() {
        // Stderr: `engines --json` and `submit --json` own stdout.
        eprintln!(
            "{} No bookmarks file at {} (run `smark init` to create one)",
            style("!").yellow(),
            path.display()
        );
        return Ok(None);
    }

    let store = load_bookmarks_file(&path).await?;
    let store = if settings.fetch_favicons {
        store.with_favicon_client(FaviconClient::new(settings.favicon_timeout()))
    } else {
        store
    };
    Ok(Some(store))
}

/// Resolve the full engine list: configured system engines first, then
/// bookmark engines sorted by title.
pub async fn collect_engines(
    settings: &Settings,
    tag_override: Option<&str>,
    event_tx: Option<mpsc::Sender<PipelineEvent>>,
) -> anyhow::Result<Vec<Engine>> {
    let system = settings.system_engines();

    let tag = tag_override.unwrap_or(&settings.search_tag);
    let bookmark = if tag.is_empty() {
        Vec::new()
    } else if let Some(store) = load_store(settings).await? {
        let pipeline = SearchPipeline::new(Arc::new(store), tag);
        match event_tx {
            Some(event_tx) => pipeline.run(event_tx).await,
            None => pipeline.engines().await,
        }
    } else {
        Vec::new()
    };

    Ok(system
        .into_iter()
        .map(Engine::from)
        .chain(bookmark.into_iter().map(Engine::from))
        .collect())
}

/// Find an engine by keyword or name, case-insensitively. Keyword
/// matches win over name matches.
pub fn find_engine<'a>(engines: &'a [Engine], query: &str) -> Option<&'a Engine> {
    let query = query.to_lowercase();
    engines
        .iter()
        .find(|e| e.keyword().is_some_and(|k| k.to_lowercase() == query))
        .or_else(|| engines.iter().find(|e| e.title().to_lowercase() == query))
}
