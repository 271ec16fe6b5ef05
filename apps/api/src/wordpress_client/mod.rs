/// WordPress client — the single point of entry for all upstream job listing calls.
///
/// No other module talks to the WordPress REST API directly. One GET per inbound
/// request, bounded by a timeout, never retried.
use std::time::Duration;

use reqwest::{header::HeaderMap, Client};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Upper bound on a single upstream call, connect through body.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Field projection requested from WordPress; everything else is dropped upstream.
pub const FIELD_PROJECTION: &str = "id,slug,title,link,date,content,meta";

const TOTAL_HEADER: &str = "x-wp-total";
const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

#[derive(Debug, Error)]
pub enum WordPressError {
    /// The request went out but no response came back (connect failure, timeout).
    #[error("WordPress API unreachable: {0}")]
    Unreachable(reqwest::Error),

    #[error("WordPress API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to read WordPress response: {0}")]
    Body(reqwest::Error),

    #[error("WordPress response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("WordPress response has unexpected shape: {0}")]
    UnexpectedShape(String),
}

/// A raw listing exactly as WordPress returned it.
///
/// Kept as a loose JSON value; `jobs::transform` turns it into a `JobRecord`
/// and nothing downstream of that sees this type.
#[derive(Debug, Clone)]
pub struct UpstreamRecord(pub Value);

/// Parameters forwarded to the WordPress listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamQuery {
    pub per_page: i64,
    pub page: i64,
    pub search: Option<String>,
    pub slug: Option<String>,
}

impl UpstreamQuery {
    /// Query string pairs in the order they are sent.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("_fields", FIELD_PROJECTION.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(slug) = &self.slug {
            pairs.push(("slug", slug.clone()));
        }
        pairs
    }
}

/// One page of listings plus the pagination totals WordPress reported.
#[derive(Debug)]
pub struct ListingPage {
    pub records: Vec<UpstreamRecord>,
    pub total: Option<u64>,
    pub total_pages: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WordPressErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct WordPressClient {
    client: Client,
    base_url: String,
}

impl WordPressClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, WordPressError> {
        Self::with_timeout(base_url, UPSTREAM_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WordPressError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WordPressError::Body)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of job listings.
    pub async fn fetch_listings(&self, query: &UpstreamQuery) -> Result<ListingPage, WordPressError> {
        debug!(url = %self.base_url, ?query, "Fetching listings from WordPress");

        let response = self
            .client
            .get(&self.base_url)
            .query(&query.to_pairs())
            .send()
            .await
            .map_err(WordPressError::Unreachable)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // WordPress errors look like {"code": "...", "message": "...", "data": {...}}
            let message = serde_json::from_str::<WordPressErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("Request failed with status code {}", status.as_u16()));
            warn!("WordPress API returned {}: {}", status, message);
            return Err(WordPressError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let total = header_count(response.headers(), TOTAL_HEADER);
        let total_pages = header_count(response.headers(), TOTAL_PAGES_HEADER);

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                WordPressError::Unreachable(e)
            } else {
                WordPressError::Body(e)
            }
        })?;

        let records = match serde_json::from_str::<Value>(&body)? {
            Value::Array(items) => items.into_iter().map(UpstreamRecord).collect::<Vec<_>>(),
            other => {
                return Err(WordPressError::UnexpectedShape(format!(
                    "expected a JSON array of listings, got {}",
                    json_kind(&other)
                )))
            }
        };

        debug!(
            "WordPress returned {} listings (total={:?}, total_pages={:?})",
            records.len(),
            total,
            total_pages
        );

        Ok(ListingPage {
            records,
            total,
            total_pages,
        })
    }
}

fn header_count(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
