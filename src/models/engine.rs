//! Search engines and the submissions they produce.
//!
//! An [`Engine`] is either configured by the application (system) or derived
//! from a keyword bookmark. Both build a [`Submission`] the same way, so the
//! selection UI can treat them uniformly.

use url::Url;

use crate::template::{SearchTemplate, SubmissionError};

/// Content type for keyword POST bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A ready-to-execute request: an absolute URL plus an optional POST body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub uri: Url,
    pub post_body: Option<PostBody>,
}

/// An encoded POST body for a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBody {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl PostBody {
    /// Wrap already-substituted bytes as a form-encoded body.
    pub fn form_encoded(bytes: Vec<u8>) -> Self {
        Self {
            content_type: FORM_CONTENT_TYPE,
            bytes,
        }
    }

    /// Body length in bytes, for the Content-Length header.
    pub fn content_length(&self) -> usize {
        self.bytes.len()
    }
}

/// A search engine available for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Engine {
    /// Configured by the application (settings file).
    System(SystemEngine),
    /// Derived from a tagged keyword bookmark.
    Bookmark(BookmarkEngine),
}

impl Engine {
    /// Display title (system engine name or bookmark title).
    pub fn title(&self) -> &str {
        match self {
            Self::System(engine) => &engine.name,
            Self::Bookmark(engine) => &engine.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::System(engine) => &engine.description,
            Self::Bookmark(engine) => &engine.description,
        }
    }

    /// Icon reference for display; always populated.
    pub fn favicon_uri(&self) -> &str {
        match self {
            Self::System(engine) => &engine.icon_uri,
            Self::Bookmark(engine) => &engine.favicon_uri,
        }
    }

    /// The search URL template.
    pub fn url(&self) -> &str {
        match self {
            Self::System(engine) => engine.template.url(),
            Self::Bookmark(engine) => engine.template.url(),
        }
    }

    /// The user-assigned keyword, for bookmark engines.
    pub fn keyword(&self) -> Option<&str> {
        match self {
            Self::System(_) => None,
            Self::Bookmark(engine) => Some(&engine.keyword),
        }
    }

    /// Build a submission for the given search terms.
    pub fn submission(&self, terms: &str) -> Result<Submission, SubmissionError> {
        match self {
            Self::System(engine) => engine.template.submission(terms),
            Self::Bookmark(engine) => engine.template.submission(terms),
        }
    }
}

impl From<SystemEngine> for Engine {
    fn from(engine: SystemEngine) -> Self {
        Self::System(engine)
    }
}

impl From<BookmarkEngine> for Engine {
    fn from(engine: BookmarkEngine) -> Self {
        Self::Bookmark(engine)
    }
}

/// An application-configured search engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemEngine {
    pub name: String,
    pub description: String,
    /// Icon reference (a data URI or any displayable URL).
    pub icon_uri: String,
    pub template: SearchTemplate,
}

impl SystemEngine {
    pub fn new(
        name: impl Into<String>,
        template: SearchTemplate,
        icon_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            icon_uri: icon_uri.into(),
            template,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A search engine derived from one keyword bookmark.
///
/// Exists only for records whose URL or decoded POST data contains the
/// substitution marker; `favicon_uri` is always populated (a genuine data URI
/// after enrichment, the shared default reference otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkEngine {
    /// Id of the bookmark the template is attached to.
    pub bookmark_id: i64,
    /// Bookmark title, used for display and ordering.
    pub title: String,
    /// Description annotation; empty when the bookmark has none.
    pub description: String,
    /// The user-assigned keyword.
    pub keyword: String,
    pub template: SearchTemplate,
    pub favicon_uri: String,
}

impl BookmarkEngine {
    pub fn new(
        bookmark_id: i64,
        title: impl Into<String>,
        keyword: impl Into<String>,
        template: SearchTemplate,
        favicon_uri: impl Into<String>,
    ) -> Self {
        Self {
            bookmark_id,
            title: title.into(),
            description: String::new(),
            keyword: keyword.into(),
            template,
            favicon_uri: favicon_uri.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The page URL favicons are looked up under (the bookmarked URL itself).
    pub fn page_url(&self) -> &str {
        self.template.url()
    }
}
