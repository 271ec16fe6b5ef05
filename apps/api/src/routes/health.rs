use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "WordPress Jobs API Middleware";

/// GET /
/// Service identity, configured rate limit, uptime and the known endpoints.
/// Never touches the upstream API.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "rateLimit": format!("{} requests per minute", state.rate_limiter.limit()),
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "endpoints": {
            "health": "GET /",
            "jobs": "GET /api/jobs?search=&slug=&per_page=&page=&location=&job_type=",
            "openapi": "GET /api/openapi.json"
        }
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::build_router;
    use crate::test_support::{get, test_state};

    #[tokio::test]
    async fn test_health_reports_service_info() {
        // Unroutable upstream: the health check must not depend on it.
        let app = build_router(test_state("http://127.0.0.1:1", 42));

        let (status, _, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["environment"], "test");
        assert_eq!(body["rateLimit"], "42 requests per minute");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
        assert_eq!(body["endpoints"]["openapi"], "GET /api/openapi.json");
    }
}
