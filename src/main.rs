//! # Wired Articles
//!
//! Crawls a news homepage (wired.com by default), collects each article's
//! title, link and publish date, writes them to a JSON file and serves that
//! file over HTTP.
//!
//! ## Usage
//!
//! ```sh
//! wired_articles                       # crawl, write wired_articles.json, serve on :3000
//! wired_articles --scrape-only -o out.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Discovery**: fetch the homepage and extract candidates from JSON-LD,
//!    summary cards and subtopic containers
//! 2. **Resolution**: fetch each article page in turn and resolve its date
//! 3. **Output**: atomically replace the JSON file (empty `[]` if the homepage failed)
//! 4. **Serving**: `/` returns the landing page, `/articles` returns the JSON

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod server;
mod utils;

use cli::Cli;
use config::Settings;
use fetch::HttpFetcher;
use outputs::json;
use server::AppState;
use utils::ensure_writable_parent;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!(version = env!("CARGO_PKG_VERSION"), "wired_articles starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    let settings = Settings::from_cli(args).await?;
    info!(
        site = %settings.site,
        output = %settings.output.display(),
        delay_ms = settings.pacing.delay.as_millis() as u64,
        "Loaded settings"
    );

    // Early check: ensure the output location is writable
    if let Err(e) = ensure_writable_parent(&settings.output).await {
        error!(
            path = %settings.output.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Crawl ----
    let fetcher = HttpFetcher::new(settings.user_agent.clone())?;
    let records = scrapers::scrape_site(
        &fetcher,
        &settings.site,
        settings.homepage_timeout,
        settings.pacing,
    )
    .await;

    // ---- Persist ----
    if let Err(e) = json::write_records(&records, &settings.output).await {
        error!(error = %e, "Failed to write articles JSON");
        return Err(e);
    }

    if records.is_empty() {
        warn!(
            site = %settings.site,
            "No articles found; the page may render client-side or the selectors may be outdated"
        );
    } else {
        info!(count = records.len(), "Articles found");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Crawl complete"
    );

    if settings.scrape_only {
        return Ok(());
    }

    // ---- Serve ----
    let state = AppState {
        articles_path: settings.output.clone(),
        landing_page: settings.landing_page.clone(),
    };
    server::serve(state, &settings.bind_addr()).await
}
