use serde::{Deserialize, Serialize};

/// A job listing in the reduced, client-facing shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: Option<i64>,
    pub slug: Option<String>,
    pub title: String,
    pub link: Option<String>,
    pub employer: String,
    pub employer_logo: Option<String>,
    pub employer_url: Option<String>,
    pub location: String,
    pub job_type: String,
    pub category: String,
    pub qualification: String,
    pub experience: String,
    pub salary: String,
    /// Plain text, at most 800 characters plus a trailing `...` when cut.
    pub description: String,
    /// `D/M/YYYY`, the en-IN short date form.
    pub posted_date: Option<String>,
    pub full_description_url: Option<String>,
}

/// Body of a successful `GET /api/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsEnvelope {
    pub success: bool,
    /// Always `jobs.len()`.
    pub count: usize,
    /// Upstream total, counted before `location`/`job_type` filtering.
    pub total: u64,
    pub total_pages: u64,
    pub current_page: i64,
    pub jobs: Vec<JobRecord>,
}

impl JobsEnvelope {
    pub fn new(jobs: Vec<JobRecord>, total: u64, total_pages: u64, current_page: i64) -> Self {
        Self {
            success: true,
            count: jobs.len(),
            total,
            total_pages,
            current_page,
            jobs,
        }
    }
}
