//! Final engine list assembly.

use crate::models::BookmarkEngine;

/// Sort engines by title, case-insensitively.
///
/// Uses Unicode lowercasing as the collation key. The sort is stable, so
/// engines with identical titles keep their resolution order and repeated
/// runs over unchanged bookmarks produce identical lists.
pub(crate) fn sorted_by_title(mut engines: Vec<BookmarkEngine>) -> Vec<BookmarkEngine> {
    engines.sort_by_cached_key(|engine| engine.title.to_lowercase());
    engines
}
