//! Initialize command.

use console::style;

use crate::config::{Settings, SystemEngineConfig};

/// Starter bookmarks file.
const SAMPLE_BOOKMARKS: &str = r#"# searchmarks bookmarks file.
#
# Bookmarks tagged with the search tag and carrying a keyword whose URL
# (or POST data) contains %s become search engines.

[[bookmarks]]
title = "Wikipedia"
url = "https://en.wikipedia.org/wiki/Special:Search?search=%s"
keyword = "wp"
description = "Search Wikipedia"
tags = ["search"]

[[bookmarks]]
title = "crates.io"
url = "https://crates.io/search?q=%s"
keyword = "crate"
description = "Search Rust crates"
tags = ["search"]

# A keyword without %s is a plain shortcut, not a search engine.
[[bookmarks]]
title = "Rust std docs"
url = "https://doc.rust-lang.org/std/"
keyword = "std"
"#;

/// Initialize the data directory with a starter config and bookmarks file.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let config_path = settings.config_path();
    if config_path.exists() {
        println!(
            "{} Config already exists: {}",
            style("!").yellow(),
            config_path.display()
        );
    } else {
        let mut starter = settings.clone();
        starter.engines = vec![SystemEngineConfig {
            name: "DuckDuckGo".to_string(),
            url: "https://duckduckgo.com/?q=%s".to_string(),
            post_data: None,
            description: "Web search".to_string(),
            icon: None,
        }];
        starter.save().await?;
        println!("  {} Wrote {}", style("✓").green(), config_path.display());
    }

    let bookmarks_path = settings.bookmarks_path();
    if bookmarks_path.exists() {
        println!(
            "{} Bookmarks file already exists: {}",
            style("!").yellow(),
            bookmarks_path.display()
        );
    } else {
        if let Some(parent) = bookmarks_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&bookmarks_path, SAMPLE_BOOKMARKS).await?;
        println!(
            "  {} Wrote {}",
            style("✓").green(),
            bookmarks_path.display()
        );
    }

    println!(
        "{} Initialized searchmarks in {}",
        style("✓").green(),
        settings.data_dir.display()
    );

    Ok(())
}
