use std::sync::Arc;

use anyhow::{Context, bail};
use secrecy::SecretString;

use mail_digest::cleaning::BodyCleaner;
use mail_digest::config::Config;
use mail_digest::context::ToolContext;
use mail_digest::error::ConfigError;
use mail_digest::gmail::{RawThread, Thread};
use mail_digest::search::{GmailClient, ThreadSearch};
use mail_digest::tools::{SearchThreadsTool, Tool};

const USAGE: &str = "\
Usage:
  mail-digest clean <thread.json>
  mail-digest search [--from <sender>] [--all] [--page-token <token>] <keywords>...

search reads the bearer token from GMAIL_ACCESS_TOKEN.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let output = match args.first().map(String::as_str) {
        Some("clean") => {
            let path = args.get(1).context(USAGE)?;
            clean_file(path, &config)?
        }
        Some("search") => search(&args[1..], &config).await?,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Clean a raw thread dump (`threads.get?format=full` JSON).
fn clean_file(path: &str, config: &Config) -> anyhow::Result<serde_json::Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    let raw: RawThread =
        serde_json::from_str(&text).with_context(|| format!("{path} is not a thread dump"))?;

    let thread = Thread::from_raw(&raw, &BodyCleaner::new(config.signatures));
    tracing::info!(
        thread_id = %thread.id,
        messages = thread.messages.len(),
        "Cleaned thread dump"
    );
    Ok(serde_json::to_value(&thread)?)
}

/// Run one search page through the agent tool against the live API.
async fn search(args: &[String], config: &Config) -> anyhow::Result<serde_json::Value> {
    let mut keywords = Vec::new();
    let mut params = serde_json::Map::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--from" => {
                let sender = iter.next().context("--from needs a value")?;
                params.insert("sender".into(), sender.clone().into());
            }
            "--page-token" => {
                let token = iter.next().context("--page-token needs a value")?;
                params.insert("page_token".into(), token.clone().into());
            }
            "--all" => {
                params.insert("include_threads_older_than_2y".into(), true.into());
            }
            word => keywords.push(word),
        }
    }
    if keywords.is_empty() {
        bail!("{USAGE}");
    }
    params.insert("keywords".into(), keywords.join(" ").into());

    let token = std::env::var("GMAIL_ACCESS_TOKEN")
        .map_err(|_| ConfigError::MissingEnvVar("GMAIL_ACCESS_TOKEN".into()))?;
    let client = GmailClient::new(SecretString::from(token))
        .with_base_url(config.search.api_base_url.clone());

    let search = ThreadSearch::new(Arc::new(client), BodyCleaner::new(config.signatures))
        .with_max_concurrent_fetches(config.search.max_concurrent_fetches);
    let tool = SearchThreadsTool::new(Arc::new(search), &config.search);

    let output = tool
        .execute(serde_json::Value::Object(params), &ToolContext::new("cli"))
        .await?;
    tracing::info!(elapsed_ms = output.duration.as_millis() as u64, "Search finished");
    Ok(output.result)
}
