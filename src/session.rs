//! Cross-run search session state.
//!
//! Engine lists are rebuilt from the store on every run and never cached.
//! What survives between runs is small: which engine the user last
//! submitted with, so it can be offered as the default next time, and a
//! run counter that lets callers discard a build superseded by a newer one.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Engine;

/// Token identifying one engine-list build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken(u64);

/// State that outlives a single engine-list build.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SearchSession {
    /// Identity of the engine most recently used for a submission:
    /// its keyword, or its title for engines without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mru_engine: Option<String>,

    #[serde(skip)]
    generation: u64,
}

/// Identity an engine is remembered under.
fn engine_key(engine: &Engine) -> &str {
    engine.keyword().unwrap_or_else(|| engine.title())
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of the most recently used engine, if any.
    pub fn mru_engine(&self) -> Option<&str> {
        self.mru_engine.as_deref()
    }

    /// Record that a submission was built with `engine`.
    pub fn note_used(&mut self, engine: &Engine) {
        self.mru_engine = Some(engine_key(engine).to_string());
    }

    /// Pick the default engine from a freshly built list: the most
    /// recently used one if it still exists, otherwise the first.
    pub fn default_engine<'a>(&self, engines: &'a [Engine]) -> Option<&'a Engine> {
        if let Some(mru) = self.mru_engine.as_deref() {
            if let Some(engine) = engines.iter().find(|e| engine_key(e) == mru) {
                return Some(engine);
            }
        }
        engines.first()
    }

    /// Start a new engine-list build, invalidating tokens of earlier ones.
    pub fn begin_run(&mut self) -> RunToken {
        self.generation += 1;
        RunToken(self.generation)
    }

    /// Whether `token` belongs to the latest build. A build that finds its
    /// token stale should discard its result instead of applying it.
    pub fn is_current(&self, token: RunToken) -> bool {
        token.0 == self.generation
    }

    /// Load session state. Any failure yields a fresh session.
    pub async fn load(path: &Path) -> Self {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session file at {}", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Failed to read session file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(session) => session,
            Err(e) => {
                warn!("Ignoring malformed session file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Persist session state.
    pub async fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;
        debug!("Saved session state to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookmarkEngine, SystemEngine};
    use crate::template::SearchTemplate;
    use tempfile::tempdir;

    fn sample_engines() -> Vec<Engine> {
        let system = SystemEngine::new(
            "DuckDuckGo",
            SearchTemplate::new("https://duckduckgo.com/?q=%s", None),
            "data:,",
        );
        let bookmark = BookmarkEngine::new(
            3,
            "Wikipedia",
            "wp",
            SearchTemplate::new("https://en.wikipedia.org/w/index.php?search=%s", None),
            "data:,",
        );
        vec![Engine::from(system), Engine::from(bookmark)]
    }

    #[test]
    fn default_engine_is_first_until_one_is_used() {
        let engines = sample_engines();
        let mut session = SearchSession::new();
        assert_eq!(session.default_engine(&engines).unwrap().title(), "DuckDuckGo");

        session.note_used(&engines[1]);
        assert_eq!(session.mru_engine(), Some("wp"));
        assert_eq!(session.default_engine(&engines).unwrap().title(), "Wikipedia");
    }

    #[test]
    fn vanished_mru_engine_falls_back_to_first() {
        let engines = sample_engines();
        let mut session = SearchSession::new();
        session.note_used(&engines[1]);

        let remaining = vec![engines[0].clone()];
        assert_eq!(
            session.default_engine(&remaining).unwrap().title(),
            "DuckDuckGo"
        );
        assert!(session.default_engine(&[]).is_none());
    }

    #[test]
    fn newer_run_invalidates_older_tokens() {
        let mut session = SearchSession::new();
        let first = session.begin_run();
        assert!(session.is_current(first));

        let second = session.begin_run();
        assert!(!session.is_current(first));
        assert!(session.is_current(second));
    }

    #[tokio::test]
    async fn session_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("session.toml");

        let engines = sample_engines();
        let mut session = SearchSession::new();
        session.note_used(&engines[1]);
        session.save(&path).await.unwrap();

        let restored = SearchSession::load(&path).await;
        assert_eq!(restored.mru_engine(), Some("wp"));
    }

    #[tokio::test]
    async fn missing_or_broken_files_yield_a_fresh_session() {
        let dir = tempdir().unwrap();

        let missing = SearchSession::load(&dir.path().join("none.toml")).await;
        assert!(missing.mru_engine().is_none());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "mru_engine = [not toml").unwrap();
        let session = SearchSession::load(&broken).await;
        assert!(session.mru_engine().is_none());
    }
}
