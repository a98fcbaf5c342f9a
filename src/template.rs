//! Search-term encoding and keyword template substitution.
//!
//! A keyword bookmark stores a URL (and optionally a POST body) containing
//! the literal marker `%s`. Building a request means percent-encoding the
//! selected text and splicing it in at every marker position.

use url::Url;

use crate::models::{KeywordRecord, PostBody, Submission};

/// The literal substitution marker used by keyword templates.
pub const SUBSTITUTION_MARKER: &str = "%s";

/// Percent-encode free text for use in a URL query component, then re-encode
/// spaces as `+` (form-encoding convention) rather than `%20`.
pub fn encode_search_terms(text: &str) -> String {
    urlencoding::encode(text).replace("%20", "+")
}

/// Errors from building a submission out of a template.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// The URL produced by substitution does not parse as an absolute URL.
    #[error("substituted URL '{url}' is not absolute: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

/// A validated search template: a URL and an optional decoded POST body,
/// with marker presence computed once at construction.
///
/// Templates without a marker in either part are not search templates; use
/// [`SearchTemplate::from_keyword_record`] to filter those out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTemplate {
    url: String,
    post_data: Option<String>,
    url_has_marker: bool,
    post_has_marker: bool,
}

impl SearchTemplate {
    /// Create a template from a URL and an already-decoded POST body.
    pub fn new(url: impl Into<String>, post_data: Option<String>) -> Self {
        let url = url.into();
        let url_has_marker = url.contains(SUBSTITUTION_MARKER);
        let post_has_marker = post_data
            .as_deref()
            .is_some_and(|p| p.contains(SUBSTITUTION_MARKER));
        Self {
            url,
            post_data,
            url_has_marker,
            post_has_marker,
        }
    }

    /// Build a template from a raw keyword record.
    ///
    /// The stored POST data is percent-decoded before the marker check
    /// (records persist it encoded). Returns `None` when neither the URL nor
    /// the decoded POST data contains `%s`; such records are plain keyword
    /// shortcuts, not search templates.
    pub fn from_keyword_record(record: &KeywordRecord) -> Option<Self> {
        let post_data = record.post_data.as_deref().map(decode_post_data);
        let template = Self::new(record.url.clone(), post_data);
        if template.has_marker() {
            Some(template)
        } else {
            None
        }
    }

    /// The URL part of the template.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The decoded POST body part, if any.
    pub fn post_data(&self) -> Option<&str> {
        self.post_data.as_deref()
    }

    /// Whether the URL or the POST body contains the substitution marker.
    pub fn has_marker(&self) -> bool {
        self.url_has_marker || self.post_has_marker
    }

    /// Build a submission for the given search terms.
    ///
    /// The URL part is substituted only when it contains the marker and is
    /// passed through unchanged otherwise. The result must parse as an
    /// absolute URL. The POST body, when present, is substituted and wrapped
    /// as a form-encoded body.
    pub fn submission(&self, terms: &str) -> Result<Submission, SubmissionError> {
        let escaped = encode_search_terms(terms);

        let url = if self.url_has_marker {
            self.url.replace(SUBSTITUTION_MARKER, &escaped)
        } else {
            self.url.clone()
        };
        let uri = Url::parse(&url).map_err(|source| SubmissionError::InvalidUrl { url, source })?;

        let post_body = self.post_data.as_deref().map(|template| {
            let body = if self.post_has_marker {
                template.replace(SUBSTITUTION_MARKER, &escaped)
            } else {
                template.to_string()
            };
            PostBody::form_encoded(body.into_bytes())
        });

        Ok(Submission { uri, post_body })
    }
}

/// Percent-decode stored POST data. Invalid `%` sequences pass through
/// verbatim; if decoding yields non-UTF-8 bytes the raw string is kept. A
/// malformed record still substitutes rather than being lost.
fn decode_post_data(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
