//! Shared fixtures for router-level tests.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crate::config::Config;
use crate::state::AppState;
use crate::wordpress_client::{WordPressClient, UPSTREAM_TIMEOUT};

pub fn test_config(upstream: &str, max_requests_per_minute: u32) -> Config {
    Config {
        port: 3000,
        wordpress_api_url: upstream.to_string(),
        max_requests_per_minute,
        environment: "test".to_string(),
        rust_log: "debug".to_string(),
        trust_proxy: false,
    }
}

pub fn test_state(upstream: &str, max_requests_per_minute: u32) -> AppState {
    test_state_with_timeout(upstream, max_requests_per_minute, UPSTREAM_TIMEOUT)
}

pub fn test_state_with_timeout(
    upstream: &str,
    max_requests_per_minute: u32,
    timeout: Duration,
) -> AppState {
    let wordpress = WordPressClient::with_timeout(upstream, timeout).unwrap();
    AppState::new(test_config(upstream, max_requests_per_minute), wordpress)
}

/// Sends a GET through the router and returns status, headers and the JSON body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}
