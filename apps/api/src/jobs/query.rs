//! Query-string normalization for `GET /api/jobs`.

use serde::Deserialize;

use crate::models::job::JobRecord;
use crate::wordpress_client::UpstreamQuery;

pub const DEFAULT_PER_PAGE: i64 = 5;
pub const MAX_PER_PAGE: i64 = 20;
pub const DEFAULT_PAGE: i64 = 1;

/// Raw query parameters. Everything stays a string so a malformed number
/// falls back to its default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct JobsParams {
    pub search: Option<String>,
    pub slug: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
}

/// Filters applied to already-transformed records.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PostFilter {
    location: Option<String>,
    job_type: Option<String>,
}

impl PostFilter {
    pub fn new(location: Option<&str>, job_type: Option<&str>) -> Self {
        Self {
            location: non_empty(location).map(|s| s.to_lowercase()),
            job_type: non_empty(job_type).map(|s| s.to_lowercase()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.location.is_some() || self.job_type.is_some()
    }

    /// Case-insensitive substring match against the display strings.
    pub fn matches(&self, job: &JobRecord) -> bool {
        let location_ok = self
            .location
            .as_deref()
            .map_or(true, |needle| job.location.to_lowercase().contains(needle));
        let job_type_ok = self
            .job_type
            .as_deref()
            .map_or(true, |needle| job.job_type.to_lowercase().contains(needle));
        location_ok && job_type_ok
    }
}

impl JobsParams {
    /// Clamped to 20 from above only. Negative values go upstream as-is and
    /// WordPress answers 400 `rest_invalid_param`, which is propagated.
    pub fn per_page(&self) -> i64 {
        nonzero_int(self.per_page.as_deref()).map_or(DEFAULT_PER_PAGE, |n| n.min(MAX_PER_PAGE))
    }

    pub fn page(&self) -> i64 {
        nonzero_int(self.page.as_deref()).unwrap_or(DEFAULT_PAGE)
    }

    pub fn upstream_query(&self) -> UpstreamQuery {
        UpstreamQuery {
            per_page: self.per_page(),
            page: self.page(),
            search: non_empty(self.search.as_deref()).map(str::to_string),
            slug: non_empty(self.slug.as_deref()).map(str::to_string),
        }
    }

    pub fn post_filter(&self) -> PostFilter {
        PostFilter::new(self.location.as_deref(), self.job_type.as_deref())
    }
}

/// Leading-integer parse (`"12abc"` is 12, `"-3x"` is -3). Zero and garbage are `None`.
fn nonzero_int(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() {
        return None;
    }
    // Saturate absurdly long digit strings instead of rejecting them.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    let n = if negative { -magnitude } else { magnitude };
    (n != 0).then_some(n)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
