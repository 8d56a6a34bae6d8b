//! Article page date resolution.
//!
//! Each candidate's page is fetched once and run through an ordered chain of
//! date signals, the first non-empty one winning:
//!
//! 1. JSON-LD `Article` objects (`datePublished`, then `dateModified`)
//! 2. `<meta property="article:published_time">`, then `<meta name="date">`
//! 3. The first `<time datetime>`, falling back to that element's text
//! 4. Byline / article date elements
//!
//! Resolution never fails: an unreachable page becomes
//! [`ResolvedDate::Unreachable`], a page without any signal becomes
//! [`ResolvedDate::NotFound`].

use crate::fetch::PageFetcher;
use crate::models::{Candidate, Record, ResolvedDate};
use crate::scrapers::jsonld;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

static META_PUBLISHED: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="article:published_time"]"#).unwrap());
static META_DATE: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"meta[name="date"]"#).unwrap());
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time[datetime]").unwrap());
static BYLINE_DATE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"span.byline-date, .article-date, [data-component*="date"]"#).unwrap()
});

/// Timing policy for the resolution loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Upper bound for a single article fetch.
    pub request_timeout: Duration,
    /// Pause after every article, whatever its outcome.
    pub delay: Duration,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn from_json_ld(document: &Html) -> Option<String> {
    jsonld::blocks(document)
        .into_iter()
        .filter_map(|block| {
            block
                .map_err(|e| debug!(error = %e, "Ignoring malformed JSON-LD block"))
                .ok()
        })
        .find_map(|block| block.items().iter().find_map(jsonld::article_date))
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .and_then(non_empty)
}

fn from_meta(document: &Html) -> Option<String> {
    meta_content(document, &META_PUBLISHED).or_else(|| meta_content(document, &META_DATE))
}

/// First `<time>` carrying a `datetime` attribute. Bare `<time>` elements
/// ("5 min read", "Updated") are not dates and are ignored.
fn from_time_element(document: &Html) -> Option<String> {
    let time = document.select(&TIME).next()?;
    time.value()
        .attr("datetime")
        .and_then(non_empty)
        .or_else(|| non_empty(&time.text().collect::<String>()))
}

fn from_byline(document: &Html) -> Option<String> {
    document
        .select(&BYLINE_DATE)
        .next()
        .and_then(|el| non_empty(&el.text().collect::<String>()))
}

/// Run the date signal chain over an article page.
pub fn extract_date(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    from_json_ld(&document)
        .or_else(|| from_meta(&document))
        .or_else(|| from_time_element(&document))
        .or_else(|| from_byline(&document))
}

/// Fetch one candidate's page and attach its date.
#[instrument(level = "info", skip_all, fields(link = %candidate.link))]
pub async fn resolve<F: PageFetcher>(fetcher: &F, candidate: Candidate, timeout: Duration) -> Record {
    let date = match fetcher.fetch_page(&candidate.link, timeout).await {
        Ok(html) => match extract_date(&html) {
            Some(date) => ResolvedDate::Found(date),
            None => {
                debug!("No date signal on article page");
                ResolvedDate::NotFound
            }
        },
        Err(e) => {
            warn!(error = %e, "Article fetch failed");
            ResolvedDate::Unreachable
        }
    };
    candidate.into_record(date)
}

/// Resolve every candidate in order, one at a time, pausing after each.
#[instrument(level = "info", skip_all, fields(count = candidates.len()))]
pub async fn resolve_all<F: PageFetcher>(
    fetcher: &F,
    candidates: Vec<Candidate>,
    pacing: Pacing,
) -> Vec<Record> {
    let records: Vec<Record> = stream::iter(candidates)
        .then(|candidate| async move {
            let record = resolve(fetcher, candidate, pacing.request_timeout).await;
            sleep(pacing.delay).await;
            record
        })
        .collect()
        .await;

    let dated = records
        .iter()
        .filter(|r| matches!(r.date, ResolvedDate::Found(_)))
        .count();
    info!(total = records.len(), dated, "Resolved article dates");
    records
}
