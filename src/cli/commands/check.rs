//! Bookmarks file diagnostics command.

use console::style;

use crate::config::Settings;
use crate::store::BookmarkStore;
use crate::template::{SearchTemplate, SUBSTITUTION_MARKER};

use super::helpers::load_store;

/// Report which tagged bookmarks are search engines, plain shortcuts,
/// or broken.
pub async fn cmd_check(settings: &Settings, tag: Option<&str>) -> anyhow::Result<()> {
    let tag = tag.unwrap_or(&settings.search_tag);
    if tag.is_empty() {
        println!(
            "{} Keyword search is disabled (empty search tag)",
            style("!").yellow()
        );
        return Ok(());
    }

    let store = match load_store(settings).await? {
        Some(store) => store,
        None => return Ok(()),
    };

    let uris = store.uris_for_tag(tag).await?;
    if uris.is_empty() {
        println!("{} No bookmarks tagged {:?}", style("!").yellow(), tag);
        return Ok(());
    }

    println!(
        "\n{}",
        style(format!("Checking {} bookmarks tagged {:?}", uris.len(), tag)).bold()
    );
    println!("{}", "-".repeat(40));

    let mut engines = 0;
    let mut shortcuts = 0;
    let mut problems = 0;

    for uri in &uris {
        let record = match store.keyword_for_uri(uri).await? {
            Some(record) => record,
            None => {
                println!("{} {}", style("!").yellow(), uri);
                println!("    no keyword registered");
                problems += 1;
                continue;
            }
        };

        let items = store.bookmark_items_for_uri(uri).await?;
        let has_bookmark = items.iter().any(|item| item.is_bookmark());

        match SearchTemplate::from_keyword_record(&record) {
            Some(_) if has_bookmark => {
                println!(
                    "{} {}  {}",
                    style("✓").green(),
                    style(&record.keyword).cyan(),
                    uri
                );
                engines += 1;
            }
            Some(_) => {
                println!(
                    "{} {}  {}",
                    style("!").yellow(),
                    style(&record.keyword).cyan(),
                    uri
                );
                println!("    keyword is usable but no bookmark item points here");
                problems += 1;
            }
            None => {
                println!(
                    "{} {}  {}",
                    style("→").dim(),
                    style(&record.keyword).cyan(),
                    uri
                );
                println!("    plain shortcut (no {} marker)", SUBSTITUTION_MARKER);
                shortcuts += 1;
            }
        }
    }

    println!();
    println!(
        "{} {} search engines, {} plain shortcuts, {} problems",
        style("✓").green(),
        engines,
        shortcuts,
        problems
    );

    Ok(())
}
