//! Axum route handler for the jobs listing API.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::jobs::query::JobsParams;
use crate::jobs::transform::clean_job_data;
use crate::models::job::{JobRecord, JobsEnvelope};
use crate::state::AppState;

/// GET /api/jobs
///
/// Fetches one page from WordPress, reshapes each listing, applies the optional
/// `location` / `job_type` filters and wraps the result in a paginated envelope.
/// `total` and `totalPages` are WordPress's numbers, counted before those filters.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    params: Result<Query<JobsParams>, QueryRejection>,
) -> Result<Json<JobsEnvelope>, AppError> {
    let Query(params) = params.map_err(|e| AppError::Internal(e.body_text()))?;

    let query = params.upstream_query();
    let filter = params.post_filter();

    let page = state.wordpress.fetch_listings(&query).await?;
    let fetched = page.records.len();

    let jobs: Vec<JobRecord> = page
        .records
        .iter()
        .filter_map(|record| match clean_job_data(record) {
            Ok(job) => Some(job),
            Err(e) => {
                warn!("Skipping unmappable listing: {e}");
                None
            }
        })
        .filter(|job| filter.matches(job))
        .collect();

    let total = page
        .total
        .filter(|n| *n > 0)
        .unwrap_or(jobs.len() as u64);
    let total_pages = page.total_pages.filter(|n| *n > 0).unwrap_or(1);

    info!(
        page = query.page,
        per_page = query.per_page,
        fetched,
        returned = jobs.len(),
        filtered = filter.is_active(),
        "Served job listings"
    );

    Ok(Json(JobsEnvelope::new(jobs, total, total_pages, query.page)))
}
