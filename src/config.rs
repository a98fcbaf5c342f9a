//! Configuration.
//!
//! Settings live in `<data_dir>/config.toml` alongside the default
//! bookmarks file and session state. The data directory comes from
//! `SEARCHMARKS_DATA_DIR`, falling back to the platform config dir.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::SystemEngine;
use crate::template::SearchTemplate;

/// Config filename inside the data directory.
const CONFIG_FILENAME: &str = "config.toml";
/// Default bookmarks filename inside the data directory.
const BOOKMARKS_FILENAME: &str = "bookmarks.toml";
/// Session state filename inside the data directory.
const SESSION_FILENAME: &str = "session.toml";

/// Tag that marks search bookmarks unless configured otherwise.
pub const DEFAULT_SEARCH_TAG: &str = "search";

/// A built-in engine defined in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemEngineConfig {
    pub name: String,
    /// Search URL template containing the substitution marker.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_data: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Icon URI. The shared default icon is used when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl SystemEngineConfig {
    /// Materialize the engine. `None` when the template has no
    /// substitution marker and therefore cannot build submissions.
    pub fn to_engine(&self) -> Option<SystemEngine> {
        let template = SearchTemplate::new(self.url.clone(), self.post_data.clone());
        if !template.has_marker() {
            return None;
        }

        let icon = self
            .icon
            .clone()
            .unwrap_or_else(|| crate::pipeline::default_favicon_uri().to_string());
        let mut engine = SystemEngine::new(self.name.clone(), template, icon);
        if !self.description.is_empty() {
            engine = engine.with_description(self.description.clone());
        }
        Some(engine)
    }
}

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base data directory. Resolved at load time, never serialized.
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// Tag that marks search bookmarks. Empty disables bookmark engines.
    pub search_tag: String,

    /// Bookmarks file path, tilde-expanded. Defaults to
    /// `<data_dir>/bookmarks.toml` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmarks_file: Option<String>,

    /// Fetch favicons over HTTP when the store has none.
    pub fetch_favicons: bool,

    /// Per-favicon-request timeout in seconds.
    pub favicon_timeout_secs: u64,

    /// Built-in engines offered alongside bookmark engines.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub engines: Vec<SystemEngineConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            search_tag: DEFAULT_SEARCH_TAG.to_string(),
            bookmarks_file: None,
            fetch_favicons: false,
            favicon_timeout_secs: 10,
            engines: Vec::new(),
        }
    }
}

/// Default data directory.
/// Falls back gracefully: config dir -> home dir -> current dir.
fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var("SEARCHMARKS_DATA_DIR")
        .ok()
        .filter(|s| !s.is_empty())
    {
        return PathBuf::from(dir);
    }

    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("searchmarks")
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Load settings, resolving the data directory from the override,
    /// the environment, or the platform default. A missing config file
    /// yields defaults; a malformed one is an error.
    pub async fn load(data_dir_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir_override.unwrap_or_else(default_data_dir);
        let path = data_dir.join(CONFIG_FILENAME);

        let mut settings = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => toml::from_str::<Settings>(&contents).map_err(|e| {
                anyhow::anyhow!("Failed to parse config file {}: {}", path.display(), e)
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                Settings::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to read config file {}: {}",
                    path.display(),
                    e
                ));
            }
        };

        settings.data_dir = data_dir;
        Ok(settings)
    }

    /// Persist settings to `<data_dir>/config.toml`.
    pub async fn save(&self) -> anyhow::Result<()> {
        self.ensure_directories()?;
        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(self.config_path(), contents).await?;
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILENAME)
    }

    /// Resolved bookmarks file path.
    pub fn bookmarks_path(&self) -> PathBuf {
        match &self.bookmarks_file {
            Some(raw) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
            None => self.data_dir.join(BOOKMARKS_FILENAME),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILENAME)
    }

    pub fn favicon_timeout(&self) -> Duration {
        Duration::from_secs(self.favicon_timeout_secs)
    }

    /// Whether bookmark engines are enabled at all.
    pub fn keyword_search_enabled(&self) -> bool {
        !self.search_tag.is_empty()
    }

    /// Materialize the configured system engines, skipping broken entries.
    pub fn system_engines(&self) -> Vec<SystemEngine> {
        self.engines
            .iter()
            .filter_map(|config| {
                let engine = config.to_engine();
                if engine.is_none() {
                    warn!(
                        "Ignoring system engine {:?}: template has no substitution marker",
                        config.name
                    );
                }
                engine
            })
            .collect()
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create data directory '{}': {}",
                    self.data_dir.display(),
                    e
                ),
            )
        })
    }
}
