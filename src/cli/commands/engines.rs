//! Engine listing command.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::models::Engine;
use crate::pipeline::PipelineEvent;
use crate::session::SearchSession;

use super::helpers::collect_engines;

/// One engine in `--json` output.
#[derive(Serialize)]
struct EngineRow<'a> {
    kind: &'static str,
    title: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<&'a str>,
    url: &'a str,
    favicon_uri: &'a str,
    default: bool,
}

/// List the resolved search engines.
pub async fn cmd_engines(settings: &Settings, tag: Option<&str>, json: bool) -> anyhow::Result<()> {
    let session = SearchSession::load(&settings.session_path()).await;

    let engines = if json {
        collect_engines(settings, tag, None).await?
    } else {
        resolve_with_spinner(settings, tag).await?
    };

    let default = session.default_engine(&engines);
    let is_default = |engine: &Engine| default.is_some_and(|d| std::ptr::eq(d, engine));

    if json {
        let rows: Vec<EngineRow> = engines
            .iter()
            .map(|engine| EngineRow {
                kind: match engine {
                    Engine::System(_) => "system",
                    Engine::Bookmark(_) => "bookmark",
                },
                title: engine.title(),
                description: engine.description(),
                keyword: engine.keyword(),
                url: engine.url(),
                favicon_uri: engine.favicon_uri(),
                default: is_default(engine),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if engines.is_empty() {
        println!("{} No search engines found", style("!").yellow());
        return Ok(());
    }

    println!(
        "\n{}",
        style(format!("Search Engines ({})", engines.len())).bold()
    );
    println!("{}", "-".repeat(40));

    for engine in &engines {
        let marker = if is_default(engine) {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{} {:<10} {}",
            marker,
            style(engine.keyword().unwrap_or("-")).cyan(),
            style(engine.title()).bold()
        );
        if !engine.description().is_empty() {
            println!("    {}", engine.description());
        }
        println!("    {}", style(engine.url()).dim());
    }

    println!("\n  {} default engine", style("*").green());

    Ok(())
}

/// Resolve engines with a progress spinner driven by pipeline events.
async fn resolve_with_spinner(
    settings: &Settings,
    tag: Option<&str>,
) -> anyhow::Result<Vec<Engine>> {
    let (event_tx, mut event_rx) = mpsc::channel::<PipelineEvent>(100);

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_message("Resolving bookmarks...");

    let progress_clone = progress.clone();
    let event_handler = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                PipelineEvent::ResolveStarted { total_uris } => {
                    progress_clone
                        .set_message(format!("Resolving {} tagged bookmarks...", total_uris));
                }
                PipelineEvent::CandidateDropped { uri, reason } => {
                    progress_clone.println(format!("{} {} ({})", style("!").yellow(), uri, reason));
                }
                PipelineEvent::EnrichStarted { total_engines } => {
                    progress_clone
                        .set_message(format!("Fetching favicons for {} engines...", total_engines));
                }
                _ => {}
            }
        }
    });

    let engines = collect_engines(settings, tag, Some(event_tx)).await?;

    // Wait for event handler to finish
    let _ = event_handler.await;
    progress.finish_and_clear();

    Ok(engines)
}
