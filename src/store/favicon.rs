//! HTTP favicon fetching.
//!
//! Downloads the conventional /favicon.ico from a page's origin. MIME
//! type comes from the Content-Type header when the server sends a
//! concrete one, otherwise from magic-byte sniffing.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::store::{FaviconData, StoreError, StoreResult};

/// Fallback MIME type when neither header nor sniffing yields one.
const FALLBACK_FAVICON_MIME: &str = "image/x-icon";

/// HTTP client for favicon downloads.
#[derive(Debug, Clone)]
pub struct FaviconClient {
    client: reqwest::Client,
}

impl FaviconClient {
    /// Create a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; searchmarks/0.4)")
                .timeout(timeout)
                .gzip(true)
                .brotli(true)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Download the favicon for `page_url` from its origin.
    pub async fn fetch(&self, page_url: &str) -> StoreResult<FaviconData> {
        let icon_url = favicon_location(page_url)?;
        debug!("Fetching favicon: {}", icon_url);

        let response = self.client.get(&icon_url).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Backend(format!(
                "favicon request returned {}",
                response.status()
            )));
        }

        let header_mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await?.to_vec();
        let mime_type = resolve_mime(header_mime.as_deref(), &bytes);

        Ok(FaviconData::new(mime_type, bytes))
    }
}

impl Default for FaviconClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

/// Derive the conventional favicon URL for a page: its origin plus
/// `/favicon.ico`.
fn favicon_location(page_url: &str) -> StoreResult<String> {
    let page = Url::parse(page_url)
        .map_err(|e| StoreError::Backend(format!("invalid page URL {}: {}", page_url, e)))?;
    let icon = page
        .join("/favicon.ico")
        .map_err(|e| StoreError::Backend(format!("cannot derive favicon URL: {}", e)))?;
    Ok(icon.to_string())
}

/// Pick a MIME type for favicon bytes.
///
/// A concrete Content-Type header wins. Generic octet-stream headers are
/// ignored in favor of sniffing the payload.
fn resolve_mime(header: Option<&str>, bytes: &[u8]) -> String {
    if let Some(value) = header {
        let essence = value.split(';').next().unwrap_or(value).trim();
        if !essence.is_empty() && essence != "application/octet-stream" {
            return essence.to_string();
        }
    }

    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_FAVICON_MIME.to_string())
}
