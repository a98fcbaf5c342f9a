//! Raw records read from the bookmark store.

use serde::{Deserialize, Serialize};

/// A keyword registered for a bookmarked URI.
///
/// `post_data` is kept percent-encoded as stored; template construction
/// decodes it before checking for the substitution marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Short keyword the user assigned (e.g. "wp").
    pub keyword: String,
    /// The bookmarked URL, possibly containing the substitution marker.
    pub url: String,
    /// Optional POST body template, percent-encoded as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_data: Option<String>,
}

/// Kind of item a URI maps to in the bookmark store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Bookmark,
    Folder,
    Separator,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bookmark => "bookmark",
            Self::Folder => "folder",
            Self::Separator => "separator",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "bookmark" => Some(Self::Bookmark),
            "folder" => Some(Self::Folder),
            "separator" => Some(Self::Separator),
            _ => None,
        }
    }
}

/// A bookmark-store item id together with its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkItem {
    /// Store row id.
    pub id: i64,
    /// Item type; only `Bookmark` items can anchor a search template.
    pub item_type: ItemType,
}

impl BookmarkItem {
    pub fn bookmark(id: i64) -> Self {
        Self {
            id,
            item_type: ItemType::Bookmark,
        }
    }

    pub fn folder(id: i64) -> Self {
        Self {
            id,
            item_type: ItemType::Folder,
        }
    }

    pub fn separator(id: i64) -> Self {
        Self {
            id,
            item_type: ItemType::Separator,
        }
    }

    pub fn is_bookmark(&self) -> bool {
        self.item_type == ItemType::Bookmark
    }
}
