//! Homepage crawl: discovery followed by per-article date resolution.
//!
//! The crawl is strictly sequential:
//!
//! 1. **Discovery** ([`discovery`]): fetch the homepage once and extract an
//!    ordered, deduplicated list of candidates.
//! 2. **Resolution** ([`detail`]): fetch each candidate's page in turn and
//!    attach its publish date, pausing between requests.
//!
//! [`jsonld`] holds the structured-data parsing both stages share.
//!
//! Only a homepage failure is fatal, and even then the crawl yields an empty
//! record list so there is always something valid to persist.

pub mod detail;
pub mod discovery;
pub mod jsonld;

use crate::fetch::PageFetcher;
use crate::models::Record;
use crate::utils::truncate_for_log;
use detail::Pacing;
use std::time::Duration;
use tracing::{error, info, instrument};
use url::Url;

/// Crawl `site` and return one record per discovered article, in discovery order.
#[instrument(level = "info", skip_all, fields(site = %site))]
pub async fn scrape_site<F: PageFetcher>(
    fetcher: &F,
    site: &Url,
    homepage_timeout: Duration,
    pacing: Pacing,
) -> Vec<Record> {
    info!("Fetching homepage");
    let html = match fetcher.fetch_page(site.as_str(), homepage_timeout).await {
        Ok(html) => html,
        Err(e) => {
            error!(
                error = %e,
                status = ?e.status(),
                body = %e.body().map(|b| truncate_for_log(b, 300)).unwrap_or_default(),
                "Failed to fetch homepage"
            );
            return Vec::new();
        }
    };
    info!(bytes = html.len(), "Homepage fetched");

    let candidates = discovery::discover(&html, site);
    info!(
        count = candidates.len(),
        "Starting article date resolution"
    );
    detail::resolve_all(fetcher, candidates, pacing).await
}
