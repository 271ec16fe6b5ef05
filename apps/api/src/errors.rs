use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::wordpress_client::WordPressError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{ success: false, error, message, ...extra }`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The upstream API answered with a non-2xx status.
    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// The upstream API could not be reached or did not answer in time.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Too many requests (limit {limit} per minute)")]
    RateLimited { limit: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<WordPressError> for AppError {
    fn from(err: WordPressError) -> Self {
        match err {
            WordPressError::Api { status, message } => AppError::Upstream { status, message },
            WordPressError::Unreachable(e) => AppError::UpstreamUnavailable(e.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the JSON error body shared by every failure response. No logging here;
    /// `into_response` records the failure once.
    pub fn body(&self) -> Value {
        let mut extra = Map::new();
        let (error, message) = match self {
            AppError::Upstream { message, .. } => ("WordPress API error", message.clone()),
            AppError::UpstreamUnavailable(_) => (
                "Service unavailable",
                "Unable to reach the job listings service".to_string(),
            ),
            AppError::RateLimited { limit } => {
                extra.insert("retryAfter".to_string(), json!("1 minute"));
                (
                    "Too many requests",
                    format!("Rate limit exceeded. Maximum {limit} requests per minute."),
                )
            }
            AppError::NotFound(msg) => ("Not found", msg.clone()),
            AppError::Internal(msg) => ("Internal server error", msg.clone()),
        };

        let mut body = Map::new();
        body.insert("success".to_string(), json!(false));
        body.insert("error".to_string(), json!(error));
        body.insert("message".to_string(), json!(message));
        body.extend(extra);
        Value::Object(body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Upstream { .. } => tracing::warn!("{self}"),
            AppError::UpstreamUnavailable(cause) => tracing::error!("Upstream unreachable: {cause}"),
            AppError::Internal(msg) => tracing::error!("Internal error: {msg}"),
            AppError::RateLimited { .. } | AppError::NotFound(_) => {}
        }

        (self.status(), Json(self.body())).into_response()
    }
}
