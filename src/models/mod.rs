//! Data models for searchmarks.

mod engine;
mod keyword;

pub use engine::{BookmarkEngine, Engine, PostBody, Submission, SystemEngine, FORM_CONTENT_TYPE};
pub use keyword::{BookmarkItem, ItemType, KeywordRecord};
