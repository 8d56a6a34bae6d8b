//! Homepage article discovery.
//!
//! Three strategies run in a fixed order over one parsed homepage, each
//! feeding the same [`CandidateSet`]:
//!
//! 1. JSON-LD blocks (`ItemList` entries and bare `Article` objects)
//! 2. Summary cards (`.summary-item`)
//! 3. Subtopic discovery containers
//!
//! The first strategy to see a link owns it; later sightings are dropped.

use crate::models::Candidate;
use crate::scrapers::jsonld;
use indexmap::IndexMap;
use indexmap::map::Entry;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse(".summary-item").unwrap());
static CARD_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[data-testid="SummaryItemHed"]"#).unwrap());
static CARD_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.summary-item__hed-link").unwrap());

static TOPIC_CONTAINER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#".SubtopicDiscoveryHedContainer-ehGPZM, div[class*="SubtopicDiscoveryHedContainer"]"#,
    )
    .unwrap()
});
static TOPIC_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TOPIC_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());

/// Insertion-ordered candidates keyed by link.
#[derive(Debug, Default)]
pub struct CandidateSet {
    by_link: IndexMap<String, Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate unless its link is already present or either field is
    /// blank. Returns whether it was added.
    pub fn insert(&mut self, title: &str, link: &str) -> bool {
        let (title, link) = (title.trim(), link.trim());
        if title.is_empty() || link.is_empty() {
            return false;
        }
        match self.by_link.entry(link.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Candidate::new(title, link));
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_link.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_link.is_empty()
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.by_link.into_values().collect()
    }
}

/// Prefix site-relative paths with the site's origin. Anything else is kept as is.
pub fn absolutize(link: &str, site: &Url) -> String {
    if link.starts_with('/') {
        format!("{}{}", site.origin().ascii_serialization(), link)
    } else {
        link.to_string()
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extract the deduplicated, discovery-ordered candidate list from a homepage.
#[instrument(level = "info", skip_all, fields(site = %site))]
pub fn discover(html: &str, site: &Url) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let mut found = CandidateSet::new();

    let added = from_json_ld(&document, &mut found);
    info!(added, "JSON-LD discovery finished");

    let added = from_summary_cards(&document, site, &mut found);
    info!(added, "Summary card discovery finished");

    let added = from_topic_containers(&document, site, &mut found);
    info!(added, "Subtopic container discovery finished");

    if found.is_empty() {
        warn!("No articles discovered on homepage");
    } else {
        info!(count = found.len(), "Discovered unique articles");
    }
    found.into_candidates()
}

/// Collect candidates from `script[type="application/ld+json"]` blocks.
///
/// An `ItemList` contributes each `itemListElement` entry (a nested `item`
/// article, a bare article, or a `name`/`url` pair); a lone `Article` object
/// contributes its `headline` and `url`. Blocks that fail to parse are logged
/// and skipped. Returns the number of candidates added.
fn from_json_ld(document: &Html, found: &mut CandidateSet) -> usize {
    let mut added = 0;
    for (index, block) in jsonld::blocks(document).into_iter().enumerate() {
        let block = match block {
            Ok(block) => block,
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed JSON-LD block on homepage");
                continue;
            }
        };
        for item in block.items() {
            for (title, link) in jsonld::homepage_entries(item) {
                if found.insert(&title, &link) {
                    added += 1;
                }
            }
        }
    }
    added
}

/// Collect candidates from `.summary-item` cards.
///
/// The title is the trimmed text of the card's `[data-testid="SummaryItemHed"]`
/// elements, the link is the `href` of its first `a.summary-item__hed-link`,
/// made absolute when it starts with `/`. Cards without that anchor, with a
/// blank title, or with an already seen link are skipped. Returns the number
/// of candidates added.
fn from_summary_cards(document: &Html, site: &Url, found: &mut CandidateSet) -> usize {
    let mut added = 0;
    for card in document.select(&CARD) {
        let title: String = card.select(&CARD_TITLE).map(text_of).collect();
        let Some(href) = card
            .select(&CARD_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        if found.insert(&title, &absolutize(href.trim(), site)) {
            added += 1;
        } else {
            debug!(href, "Summary card skipped");
        }
    }
    added
}

/// Collect candidates from subtopic discovery containers.
///
/// Matches `.SubtopicDiscoveryHedContainer-ehGPZM` and any `div` whose class
/// contains `SubtopicDiscoveryHedContainer`. Only the container's first
/// `a[href]` is used; its title is the text of the `h2` inside that anchor.
/// Containers without an anchor or heading text, or with an already seen
/// link, are skipped. Returns the number of candidates added.
fn from_topic_containers(document: &Html, site: &Url, found: &mut CandidateSet) -> usize {
    let mut added = 0;
    for container in document.select(&TOPIC_CONTAINER) {
        let Some(anchor) = container.select(&TOPIC_LINK).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let title: String = anchor.select(&TOPIC_TITLE).map(text_of).collect();
        if found.insert(&title, &absolutize(href.trim(), site)) {
            added += 1;
        } else {
            debug!(href, "Subtopic container skipped");
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("https://site").unwrap()
    }

    fn links(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.link.as_str()).collect()
    }

    #[test]
    fn test_candidate_set_dedups_and_keeps_first() {
        let mut set = CandidateSet::new();
        assert!(set.insert("First", "https://site/a"));
        assert!(!set.insert("Second", "https://site/a"));
        assert!(set.insert("Other", "https://site/b"));
        assert!(!set.insert("   ", "https://site/c"));
        assert!(!set.insert("Blank link", "  "));

        let candidates = set.into_candidates();
        assert_eq!(
            candidates,
            vec![
                Candidate::new("First", "https://site/a"),
                Candidate::new("Other", "https://site/b"),
            ]
        );
    }

    #[test]
    fn test_absolutize() {
        let site = Url::parse("https://www.wired.com/some/page").unwrap();
        assert_eq!(
            absolutize("/story/x", &site),
            "https://www.wired.com/story/x"
        );
        assert_eq!(
            absolutize("https://other.com/story", &site),
            "https://other.com/story"
        );
        assert_eq!(absolutize("story/x", &site), "story/x");
    }

    #[test]
    fn test_structured_data_wins_over_card_duplicate() {
        let html = r#"
        <html><head>
          <script type="application/ld+json">
            {"@type": "Article", "headline": "A", "url": "https://site/a"}
          </script>
        </head><body>
          <div class="summary-item">
            <a class="summary-item__hed-link" href="/a">
              <h3 data-testid="SummaryItemHed">A2</h3>
            </a>
          </div>
        </body></html>
        "#;

        let candidates = discover(html, &site());
        assert_eq!(candidates, vec![Candidate::new("A", "https://site/a")]);
    }

    #[test]
    fn test_malformed_block_does_not_stop_later_blocks() {
        let html = r#"
          <script type="application/ld+json">{"@type": "Article", "headline": </script>
          <script type="application/ld+json">
            [{"@type": "Article", "headline": "Later", "url": "https://site/later"}]
          </script>
        "#;

        let candidates = discover(html, &site());
        assert_eq!(candidates, vec![Candidate::new("Later", "https://site/later")]);
    }

    #[test]
    fn test_item_list_discovery() {
        let html = r#"
          <script type="application/ld+json">
            {
              "@context": "https://schema.org",
              "@type": "ItemList",
              "itemListElement": [
                {"@type": "ListItem", "position": 1,
                 "item": {"@type": "Article", "headline": "Nested", "url": "https:\\u002F\\u002Fsite\\u002Fnested"}},
                {"@type": "ListItem", "position": 2, "name": "Named", "url": "https://site/named"},
                {"@type": "ListItem", "position": 3, "name": "Dup", "url": "https://site/named"}
              ]
            }
          </script>
        "#;

        let candidates = discover(html, &site());
        assert_eq!(
            candidates,
            vec![
                Candidate::new("Nested", "https://site/nested"),
                Candidate::new("Named", "https://site/named"),
            ]
        );
    }

    #[test]
    fn test_summary_cards() {
        let html = r#"
          <div class="summary-item">
            <a class="summary-item__hed-link" href="/story/one">
              <h3 data-testid="SummaryItemHed">  One  </h3>
            </a>
          </div>
          <div class="summary-item">
            <a class="summary-item__hed-link" href="/story/empty">
              <h3 data-testid="SummaryItemHed">   </h3>
            </a>
          </div>
          <div class="summary-item">
            <h3 data-testid="SummaryItemHed">No link</h3>
          </div>
          <div class="summary-item">
            <a class="summary-item__hed-link" href="https://elsewhere.com/two">
              <h3 data-testid="SummaryItemHed">Two</h3>
            </a>
          </div>
        "#;

        let candidates = discover(html, &site());
        assert_eq!(
            candidates,
            vec![
                Candidate::new("One", "https://site/story/one"),
                Candidate::new("Two", "https://elsewhere.com/two"),
            ]
        );
    }

    #[test]
    fn test_topic_containers_both_class_patterns() {
        let html = r#"
          <div class="SubtopicDiscoveryHedContainer-ehGPZM">
            <a href="/story/exact"><h2>Exact</h2></a>
          </div>
          <div class="SubtopicDiscoveryHedContainer-xyz123 other">
            <a href="/story/prefix"><h2>Prefix</h2></a>
          </div>
          <div class="SubtopicDiscoveryHedContainer-abc">
            <a href="/story/no-heading"><span>Not a heading</span></a>
          </div>
        "#;

        let candidates = discover(html, &site());
        assert_eq!(
            links(&candidates),
            vec!["https://site/story/exact", "https://site/story/prefix"]
        );
        assert_eq!(candidates[0].title, "Exact");
    }

    #[test]
    fn test_strategy_order_and_cross_strategy_dedup() {
        let html = r#"
          <script type="application/ld+json">
            {"@type": "Article", "headline": "From JSON-LD", "url": "https://site/story/1"}
          </script>
          <div class="SubtopicDiscoveryHedContainer-ehGPZM">
            <a href="/story/3"><h2>Topic three</h2></a>
          </div>
          <div class="SubtopicDiscoveryHedContainer-ehGPZM">
            <a href="/story/2"><h2>Topic duplicate</h2></a>
          </div>
          <div class="summary-item">
            <a class="summary-item__hed-link" href="/story/2"><h3 data-testid="SummaryItemHed">Card two</h3></a>
          </div>
          <div class="summary-item">
            <a class="summary-item__hed-link" href="/story/1"><h3 data-testid="SummaryItemHed">Card one</h3></a>
          </div>
        "#;

        let first = discover(html, &site());
        assert_eq!(
            first,
            vec![
                Candidate::new("From JSON-LD", "https://site/story/1"),
                Candidate::new("Card two", "https://site/story/2"),
                Candidate::new("Topic three", "https://site/story/3"),
            ]
        );
        assert_eq!(discover(html, &site()), first);
    }

    #[test]
    fn test_empty_page_yields_nothing() {
        assert!(discover("<html><body></body></html>", &site()).is_empty());
    }
}
