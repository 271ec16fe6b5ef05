use std::time::Instant;

use crate::config::Config;
use crate::rate_limit::FixedWindowLimiter;
use crate::wordpress_client::WordPressClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub wordpress: WordPressClient,
    pub config: Config,
    /// Per-client counters, consulted by the rate-limit middleware before routing.
    pub rate_limiter: FixedWindowLimiter,
    /// Process start, for the health check's uptime.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, wordpress: WordPressClient) -> Self {
        Self {
            rate_limiter: FixedWindowLimiter::new(config.max_requests_per_minute),
            wordpress,
            config,
            started_at: Instant::now(),
        }
    }
}
