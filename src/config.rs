//! Runtime settings.
//!
//! Each setting is taken from the command line if given, otherwise from the
//! optional YAML file, otherwise from the defaults below.
//!
//! ```yaml
//! site_url: https://www.wired.com
//! output: wired_articles.json
//! homepage_timeout_ms: 15000
//! article_timeout_ms: 10000
//! delay_ms: 500
//! ```

use crate::cli::Cli;
use crate::scrapers::detail::Pacing;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_SITE_URL: &str = "https://www.wired.com";
pub const DEFAULT_OUTPUT: &str = "wired_articles.json";
pub const DEFAULT_LANDING_PAGE: &str = "wired-articles-list.html";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";
pub const DEFAULT_HOMEPAGE_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_ARTICLE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_DELAY_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid site url {url:?}: {source}")]
    SiteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Settings as they appear in the YAML file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub site_url: Option<String>,
    pub output: Option<PathBuf>,
    pub landing_page: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user_agent: Option<String>,
    pub homepage_timeout_ms: Option<u64>,
    pub article_timeout_ms: Option<u64>,
    pub delay_ms: Option<u64>,
}

impl FileConfig {
    pub fn from_yaml(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_yaml(&yaml, path)?;
        debug!(?config, "Loaded config file");
        Ok(config)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub site: Url,
    pub output: PathBuf,
    pub landing_page: PathBuf,
    pub host: String,
    pub port: u16,
    pub user_agent: String,
    pub homepage_timeout: Duration,
    pub pacing: Pacing,
    pub scrape_only: bool,
}

impl Settings {
    /// Merge command-line values over file values over defaults.
    pub fn resolve(cli: Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let site_url = cli
            .site_url
            .or(file.site_url)
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        let site = Url::parse(&site_url).map_err(|source| ConfigError::SiteUrl {
            url: site_url.clone(),
            source,
        })?;
        let millis = |flag: Option<u64>, from_file: Option<u64>, default: u64| {
            Duration::from_millis(flag.or(from_file).unwrap_or(default))
        };

        Ok(Self {
            site,
            output: cli
                .output
                .or(file.output)
                .unwrap_or_else(|| DEFAULT_OUTPUT.into()),
            landing_page: cli
                .landing_page
                .or(file.landing_page)
                .unwrap_or_else(|| DEFAULT_LANDING_PAGE.into()),
            host: cli
                .host
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            user_agent: cli
                .user_agent
                .or(file.user_agent)
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            homepage_timeout: millis(
                cli.homepage_timeout_ms,
                file.homepage_timeout_ms,
                DEFAULT_HOMEPAGE_TIMEOUT_MS,
            ),
            pacing: Pacing {
                request_timeout: millis(
                    cli.article_timeout_ms,
                    file.article_timeout_ms,
                    DEFAULT_ARTICLE_TIMEOUT_MS,
                ),
                delay: millis(cli.delay_ms, file.delay_ms, DEFAULT_DELAY_MS),
            },
            scrape_only: cli.scrape_only,
        })
    }

    /// Read the config file named on the command line, if any, then resolve.
    pub async fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path).await?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
