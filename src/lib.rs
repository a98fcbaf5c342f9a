//! searchmarks - keyword bookmarks as search engines.
//!
//! Resolves bookmarks carrying a search tag and a keyword into search
//! engines whose templates substitute the user's terms, enriched with
//! favicons and sorted by title.

pub mod cli;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod store;
pub mod template;

pub use config::Settings;
pub use models::{BookmarkEngine, Engine, Submission, SystemEngine};
pub use pipeline::{PipelineEvent, SearchPipeline};
pub use session::SearchSession;
pub use store::{BookmarkStore, MemoryBookmarkStore};
pub use template::{SearchTemplate, SUBSTITUTION_MARKER};
