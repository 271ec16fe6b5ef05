pub mod health;
pub mod openapi;

use axum::{http::Uri, middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::errors::AppError;
use crate::jobs::handlers;
use crate::rate_limit::rate_limit_middleware;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} not found", uri.path()))
}

/// Builds the full application: routes, 404 fallback, rate limiting, CORS and tracing.
/// The rate limiter runs on every request, matched route or not.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/api/jobs", get(handlers::handle_list_jobs))
        .route("/api/openapi.json", get(openapi::openapi_handler))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_middleware,
                )),
        )
        .with_state(state)
}
