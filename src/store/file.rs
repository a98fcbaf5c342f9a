//! TOML bookmarks file loading.
//!
//! Reads a `[[bookmarks]]` file into a [`MemoryBookmarkStore`]. Entries
//! carry a title and URL plus optional keyword, POST data, description,
//! tags, and an icon given inline as base64 or as a path relative to
//! the file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::KeywordRecord;
use crate::store::{
    FaviconData, MemoryBookmarkStore, StoreError, StoreResult, DESCRIPTION_ANNOTATION,
};

#[derive(Debug, Deserialize)]
struct BookmarksFile {
    #[serde(default)]
    bookmarks: Vec<BookmarkEntry>,
}

#[derive(Debug, Deserialize)]
struct BookmarkEntry {
    /// Explicit item id. Assigned sequentially when omitted.
    #[serde(default)]
    id: Option<i64>,
    title: String,
    url: String,
    #[serde(default)]
    keyword: Option<String>,
    #[serde(default)]
    post_data: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    /// Inline icon, base64-encoded.
    #[serde(default)]
    icon_data: Option<String>,
    /// Icon file path, relative to the bookmarks file.
    #[serde(default)]
    icon_file: Option<PathBuf>,
    #[serde(default)]
    icon_mime: Option<String>,
}

/// Load a bookmarks file into an in-memory store.
pub async fn load_bookmarks_file(path: &Path) -> StoreResult<MemoryBookmarkStore> {
    let contents = tokio::fs::read_to_string(path).await?;

    let parsed: BookmarksFile = toml::from_str(&contents)
        .map_err(|e| StoreError::Parse(format!("{}: {}", path.display(), e)))?;

    let base_dir = path.parent().map(Path::to_path_buf);
    let mut store = MemoryBookmarkStore::new();
    let mut seen_ids = BTreeSet::new();
    let mut next_id: i64 = 1;

    for entry in parsed.bookmarks {
        if entry.url.is_empty() {
            warn!("Skipping bookmark entry without URL: {:?}", entry.title);
            continue;
        }

        let id = match entry.id {
            Some(id) => {
                next_id = next_id.max(id.saturating_add(1));
                id
            }
            None => {
                let id = next_id;
                next_id += 1;
                id
            }
        };
        if !seen_ids.insert(id) {
            warn!("Duplicate bookmark id {} in {}", id, path.display());
        }

        store.insert_bookmark(id, entry.title, entry.url.clone());

        for tag in entry.tags {
            store.tag_uri(tag, entry.url.clone());
        }

        if let Some(keyword) = entry.keyword {
            store.set_keyword(KeywordRecord {
                keyword,
                url: entry.url.clone(),
                post_data: entry.post_data,
            });
        }

        if let Some(description) = entry.description {
            store.set_annotation(id, DESCRIPTION_ANNOTATION, description);
        }

        if let Some(icon) =
            load_entry_icon(entry.icon_data, entry.icon_file, entry.icon_mime, &base_dir).await?
        {
            store.set_favicon(entry.url, icon);
        }
    }

    debug!(
        "Loaded {} bookmark URIs from {}",
        store.uri_count(),
        path.display()
    );
    Ok(store)
}

/// Materialize an entry's icon. Inline base64 wins over a file path.
async fn load_entry_icon(
    icon_data: Option<String>,
    icon_file: Option<PathBuf>,
    icon_mime: Option<String>,
    base_dir: &Option<PathBuf>,
) -> StoreResult<Option<FaviconData>> {
    use base64::Engine;

    if let Some(encoded) = icon_data {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| StoreError::Parse(format!("invalid base64 icon data: {}", e)))?;
        let mime = icon_mime.unwrap_or_else(|| sniff_icon_mime(&bytes));
        return Ok(Some(FaviconData::new(mime, bytes)));
    }

    if let Some(rel) = icon_file {
        let resolved = match base_dir {
            Some(dir) if rel.is_relative() => dir.join(&rel),
            _ => rel.clone(),
        };
        let bytes = tokio::fs::read(&resolved).await?;
        let mime = icon_mime
            .or_else(|| {
                mime_guess::from_path(&resolved)
                    .first()
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| sniff_icon_mime(&bytes));
        return Ok(Some(FaviconData::new(mime, bytes)));
    }

    Ok(None)
}

fn sniff_icon_mime(bytes: &[u8]) -> String {
    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| "image/x-icon".to_string())
}
