//! Submission command.

use console::style;
use serde::Serialize;
use tracing::warn;

use crate::config::Settings;
use crate::session::SearchSession;

use super::helpers::{collect_engines, find_engine};

#[derive(Serialize)]
struct SubmissionOutput<'a> {
    engine: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<&'a str>,
    uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    post: Option<PostOutput>,
}

#[derive(Serialize)]
struct PostOutput {
    content_type: String,
    body: String,
}

/// Build and print a search submission for the chosen engine.
pub async fn cmd_submit(
    settings: &Settings,
    query: &str,
    terms: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let engines = collect_engines(settings, None, None).await?;

    let engine = match find_engine(&engines, query) {
        Some(engine) => engine,
        None => {
            println!("{} No engine matches {:?}", style("✗").red(), query);
            if !engines.is_empty() {
                println!("  Available engines:");
                for engine in &engines {
                    match engine.keyword() {
                        Some(keyword) => {
                            println!("    {}  {}", style(keyword).cyan(), engine.title())
                        }
                        None => println!("    {}", engine.title()),
                    }
                }
            }
            std::process::exit(1);
        }
    };

    let terms = terms.join(" ");
    let submission = match engine.submission(&terms) {
        Ok(submission) => submission,
        Err(e) => {
            println!("{} Failed to build submission: {}", style("✗").red(), e);
            std::process::exit(1);
        }
    };

    // Remember the choice for next time.
    let session_path = settings.session_path();
    let mut session = SearchSession::load(&session_path).await;
    session.note_used(engine);
    if let Err(e) = session.save(&session_path).await {
        warn!("Failed to save session state: {}", e);
    }

    if json {
        let output = SubmissionOutput {
            engine: engine.title(),
            keyword: engine.keyword(),
            uri: submission.uri.to_string(),
            post: submission.post_body.as_ref().map(|post| PostOutput {
                content_type: post.content_type.to_string(),
                body: String::from_utf8_lossy(&post.bytes).into_owned(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        style("✓").green(),
        style(engine.title()).bold(),
        style(format!("({})", terms)).dim()
    );
    println!("  {}", submission.uri);
    if let Some(post) = &submission.post_body {
        println!(
            "  {} {}",
            style("POST").cyan(),
            String::from_utf8_lossy(&post.bytes)
        );
        println!(
            "  {} {} ({} bytes)",
            style("Content-Type:").dim(),
            post.content_type,
            post.content_length()
        );
    }

    Ok(())
}
