//! Fixed-window, per-client request throttling.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

pub const WINDOW: Duration = Duration::from_secs(60);

/// Upper bound on tracked clients. Once reached, expired windows are swept (at
/// most once per window) and clients that still do not fit are refused.
const MAX_TRACKED_CLIENTS: usize = 10_000;

const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct Windows {
    by_client: HashMap<String, Window>,
    last_sweep: Instant,
}

/// Outcome of counting one request against its client's window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets.
    pub reset_after: Duration,
}

/// Counter map keyed by client identity. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct FixedWindowLimiter {
    windows: Arc<Mutex<Windows>>,
    limit: u32,
    window: Duration,
    capacity: usize,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32) -> Self {
        Self::with_window(limit, WINDOW)
    }

    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(Windows {
                by_client: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            limit,
            window,
            capacity: MAX_TRACKED_CLIENTS,
        }
    }

    #[cfg(test)]
    fn with_capacity(limit: u32, capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::new(limit)
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Counts one request for `client` and reports whether it may proceed.
    pub async fn check(&self, client: &str) -> Decision {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        if windows.by_client.len() >= self.capacity && !windows.by_client.contains_key(client) {
            if now.duration_since(windows.last_sweep) >= self.window {
                let before = windows.by_client.len();
                let window = self.window;
                windows
                    .by_client
                    .retain(|_, w| now.duration_since(w.started) < window);
                windows.last_sweep = now;
                debug!(
                    "Swept {} expired rate-limit windows",
                    before - windows.by_client.len()
                );
            }

            if windows.by_client.len() >= self.capacity {
                warn!(client = %client, "Rate limiter at capacity, refusing new client");
                return Decision {
                    allowed: false,
                    limit: self.limit,
                    remaining: 0,
                    reset_after: self
                        .window
                        .saturating_sub(now.duration_since(windows.last_sweep)),
                };
            }
        }

        let entry = windows.by_client.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }
        entry.count = entry.count.saturating_add(1);

        Decision {
            allowed: entry.count <= self.limit,
            limit: self.limit,
            remaining: self.limit.saturating_sub(entry.count),
            reset_after: self.window.saturating_sub(now.duration_since(entry.started)),
        }
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.by_client.len()
    }
}

/// Counts every request before routing; over-limit clients get a 429.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_key(&request, state.config.trust_proxy);
    let decision = state.rate_limiter.check(&client).await;

    if !decision.allowed {
        warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
        let mut response = AppError::RateLimited {
            limit: decision.limit,
        }
        .into_response();
        let headers = response.headers_mut();
        set_rate_limit_headers(headers, &decision);
        headers.insert(header::RETRY_AFTER, HeaderValue::from(reset_secs(&decision)));
        return response;
    }

    let mut response = next.run(request).await;
    set_rate_limit_headers(response.headers_mut(), &decision);
    response
}

fn set_rate_limit_headers(headers: &mut HeaderMap, decision: &Decision) {
    headers.insert("ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("ratelimit-reset", HeaderValue::from(reset_secs(decision)));
}

/// Whole seconds until reset, rounded up.
fn reset_secs(decision: &Decision) -> u64 {
    let d = decision.reset_after;
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

/// Client identity is the peer address. With `trust_proxy`, the first
/// `X-Forwarded-For` hop or `X-Real-IP` set by the fronting proxy wins.
fn client_key(request: &Request<Body>, trust_proxy: bool) -> String {
    let forwarded = if trust_proxy {
        forwarded_ip(request)
    } else {
        None
    };
    forwarded
        .or_else(|| peer_ip(request))
        .map_or_else(|| UNKNOWN_CLIENT.to_string(), |ip| ip.to_string())
}

fn forwarded_ip(request: &Request<Body>) -> Option<IpAddr> {
    if let Some(forwarded) = request.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse() {
                    return Some(ip);
                }
            }
        }
    }

    if let Some(real_ip) = request.headers().get("X-Real-IP") {
        if let Ok(ip) = real_ip.to_str().unwrap_or_default().trim().parse() {
            return Some(ip);
        }
    }

    None
}

fn peer_ip(request: &Request<Body>) -> Option<IpAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
}
