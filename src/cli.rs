//! Command-line interface definitions.
//!
//! Every option can also come from an environment variable. Options left
//! unset fall back to the YAML config file (if given) and then to built-in
//! defaults; see [`crate::config`].

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Crawl wired.com, write wired_articles.json and serve on :3000
/// wired_articles
///
/// # Crawl only, slower pacing, custom output
/// wired_articles --scrape-only --delay-ms 2000 -o /var/lib/wired/articles.json
///
/// # Settings from a YAML file
/// wired_articles --config wired.yaml
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "WIRED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Homepage to crawl
    #[arg(long, env = "WIRED_SITE_URL")]
    pub site_url: Option<String>,

    /// File the crawled articles are written to and served from
    #[arg(short, long, env = "WIRED_OUTPUT")]
    pub output: Option<PathBuf>,

    /// HTML page served at `/`
    #[arg(long, env = "WIRED_LANDING_PAGE")]
    pub landing_page: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "WIRED_HOST")]
    pub host: Option<String>,

    /// Port to bind the HTTP server to
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// User-Agent header sent with every request
    #[arg(long, env = "WIRED_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Timeout for the homepage request, in milliseconds
    #[arg(long, env = "WIRED_HOMEPAGE_TIMEOUT_MS")]
    pub homepage_timeout_ms: Option<u64>,

    /// Timeout for each article request, in milliseconds
    #[arg(long, env = "WIRED_ARTICLE_TIMEOUT_MS")]
    pub article_timeout_ms: Option<u64>,

    /// Pause after each article request, in milliseconds
    #[arg(long, env = "WIRED_DELAY_MS")]
    pub delay_ms: Option<u64>,

    /// Crawl and write the JSON file, then exit without serving
    #[arg(long)]
    pub scrape_only: bool,
}
