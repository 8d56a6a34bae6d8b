//! HTTP page fetching.
//!
//! [`PageFetcher`] is the seam the scrapers fetch through. [`HttpFetcher`]
//! is the production implementation on top of `reqwest`; tests substitute a
//! canned in-memory fetcher.
//!
//! Every request carries the configured `User-Agent` and its own timeout.
//! A timeout is reported like any other failure; there are no retries.

use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument};

/// Failure to retrieve a page body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("unexpected status {status}")]
    Status { status: StatusCode, body: String },
}

impl FetchError {
    /// The HTTP status, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The response body, if a non-success response was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            FetchError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Something that can GET a page and return its body as text.
pub trait PageFetcher {
    /// Fetch `url`, giving up after `timeout`.
    async fn fetch_page(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

/// `reqwest`-backed [`PageFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(user_agent: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            user_agent: user_agent.into(),
        })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self), fields(timeout_ms = timeout.as_millis() as u64))]
    async fn fetch_page(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout(timeout)
            } else {
                FetchError::Request(e)
            }
        };

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_err)?;

        let status = response.status();
        let body = response.text().await.map_err(map_err)?;
        debug!(
            %status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );

        if !status.is_success() {
            return Err(FetchError::Status { status, body });
        }
        Ok(body)
    }
}
