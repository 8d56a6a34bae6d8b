//! Data models for discovered and resolved articles.
//!
//! - [`Candidate`]: an article reference found on the homepage, no date yet
//! - [`Record`]: a candidate with its resolved (or sentinel) publish date
//! - [`ResolvedDate`]: the outcome of date resolution for one article
//!
//! Records serialize to the flat `{title, link, date}` shape served at
//! `/articles`.

use serde::{Deserialize, Serialize};

/// Serialized form of [`ResolvedDate::NotFound`].
pub const DATE_NOT_FOUND: &str = "N/A";

/// An article reference discovered on the homepage.
///
/// The `link` is absolute and acts as the uniqueness key during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Headline text, trimmed.
    pub title: String,
    /// Absolute article URL.
    pub link: String,
}

impl Candidate {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    /// Attach the resolved date, producing the final [`Record`].
    pub fn into_record(self, date: ResolvedDate) -> Record {
        Record {
            title: self.title,
            link: self.link,
            date,
        }
    }
}

/// Outcome of resolving an article's publish date.
///
/// Serializes as the date string, `"N/A"` when the page had no date signal,
/// or `null` when the page could not be fetched at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ResolvedDate {
    /// A date string as published by the page.
    Found(String),
    /// The page was reached but carried none of the known date signals.
    NotFound,
    /// The page itself could not be fetched.
    Unreachable,
}

impl From<Option<String>> for ResolvedDate {
    fn from(value: Option<String>) -> Self {
        match value {
            None => ResolvedDate::Unreachable,
            Some(s) if s == DATE_NOT_FOUND => ResolvedDate::NotFound,
            Some(s) => ResolvedDate::Found(s),
        }
    }
}

impl From<ResolvedDate> for Option<String> {
    fn from(value: ResolvedDate) -> Self {
        match value {
            ResolvedDate::Found(s) => Some(s),
            ResolvedDate::NotFound => Some(DATE_NOT_FOUND.to_string()),
            ResolvedDate::Unreachable => None,
        }
    }
}

/// A finalized article entry, the unit of persisted output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub link: String,
    pub date: ResolvedDate,
}
