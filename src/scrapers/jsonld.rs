//! JSON-LD (`<script type="application/ld+json">`) handling shared by the
//! homepage and article-page scrapers.
//!
//! Each script block parses into a [`JsonLdBlock`]: either a single object or
//! an array of them. Homepage list entries are classified into the closed set
//! of shapes in [`ListEntry`] instead of probing fields ad hoc.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

static JSON_LD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

static ESCAPED_SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\u002f").unwrap());

type Object = Map<String, Value>;

/// One parsed JSON-LD script block.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonLdBlock {
    Single(Value),
    Many(Vec<Value>),
}

impl JsonLdBlock {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(match serde_json::from_str::<Value>(raw.trim())? {
            Value::Array(items) => JsonLdBlock::Many(items),
            other => JsonLdBlock::Single(other),
        })
    }

    /// Top-level entries of the block, in document order.
    pub fn items(&self) -> &[Value] {
        match self {
            JsonLdBlock::Single(value) => std::slice::from_ref(value),
            JsonLdBlock::Many(values) => values,
        }
    }
}

/// Parse every JSON-LD block in `document`, in document order.
///
/// Malformed blocks come back as `Err` so callers decide how loudly to skip them.
pub fn blocks(document: &Html) -> Vec<Result<JsonLdBlock, serde_json::Error>> {
    document
        .select(&JSON_LD_SELECTOR)
        .map(|script| JsonLdBlock::parse(&script.text().collect::<String>()))
        .collect()
}

/// True when `@type` is `Article`, either directly or as one entry of a type array.
pub fn is_article(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == "Article",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Article")),
        _ => false,
    }
}

fn is_item_list(value: &Value) -> bool {
    matches!(value.get("@type"), Some(Value::String(t)) if t == "ItemList")
}

fn non_empty_str<'a>(object: &'a Object, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Replace literal `\u002F` escapes left in URLs by double-escaped JSON.
pub fn normalize_url(url: &str) -> String {
    ESCAPED_SLASH.replace_all(url, "/").into_owned()
}

/// The shapes a homepage entry is recognised as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListEntry<'a> {
    /// The entry itself is typed `Article`.
    Article(&'a Object),
    /// The entry wraps an `Article` under `item`.
    NestedArticle(&'a Object),
    /// Any entry with a `name` and `url`.
    NamedLink { name: &'a str, url: &'a str },
}

impl<'a> ListEntry<'a> {
    /// Classify `value`, taking the first matching shape.
    pub fn classify(value: &'a Value) -> Option<Self> {
        let object = value.as_object()?;
        if is_article(value) {
            return Some(ListEntry::Article(object));
        }
        if let Some(nested) = object.get("item").filter(|item| is_article(item)) {
            return nested.as_object().map(ListEntry::NestedArticle);
        }
        let name = non_empty_str(object, "name")?;
        let url = non_empty_str(object, "url")?;
        Some(ListEntry::NamedLink { name, url })
    }

    /// `(title, link)` for the entry, if it carries both.
    pub fn title_and_link(&self) -> Option<(String, String)> {
        match *self {
            ListEntry::Article(article) | ListEntry::NestedArticle(article) => {
                article_title_and_link(article)
            }
            ListEntry::NamedLink { name, url } => Some((name.to_string(), normalize_url(url))),
        }
    }
}

/// Headline (or name) and URL of an `Article` object.
fn article_title_and_link(article: &Object) -> Option<(String, String)> {
    let title = non_empty_str(article, "headline").or_else(|| non_empty_str(article, "name"))?;
    let url = non_empty_str(article, "url")?;
    Some((title.to_string(), normalize_url(url)))
}

/// Articles advertised by one top-level homepage entry, in order.
///
/// An `ItemList` yields each classifiable element; a bare `Article` yields itself.
pub fn homepage_entries(value: &Value) -> Vec<(String, String)> {
    if is_item_list(value) {
        return value
            .get("itemListElement")
            .and_then(Value::as_array)
            .map(|elements| {
                elements
                    .iter()
                    .filter_map(ListEntry::classify)
                    .filter_map(|entry| entry.title_and_link())
                    .collect()
            })
            .unwrap_or_default();
    }
    if is_article(value) {
        return value
            .as_object()
            .and_then(article_title_and_link)
            .into_iter()
            .collect();
    }
    Vec::new()
}

/// `datePublished`, else `dateModified`, of an `Article` object.
pub fn article_date(value: &Value) -> Option<String> {
    if !is_article(value) {
        return None;
    }
    let object = value.as_object()?;
    non_empty_str(object, "datePublished")
        .or_else(|| non_empty_str(object, "dateModified"))
        .map(str::to_string)
}
