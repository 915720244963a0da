//! API middleware.
//!
//! Request budgets are tracked per authenticated user rather than per client
//! address, so proxies and shared NATs don't pool unrelated callers and a
//! forged `X-Forwarded-For` buys nothing.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{MatchedPath, State};
use axum::http::{header, HeaderName, HeaderValue, Method, Request, Response};
use axum::middleware::Next;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::error::{redacted_internal_error, InternalErrorDetail};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-user request budget, keyed by verified uid.
pub struct UserRateLimits {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl UserRateLimits {
    /// `requests_per_second` is both the refill rate and the burst size.
    /// Zero falls back to 10 req/s.
    pub fn new(requests_per_second: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second)
            .or(NonZeroU32::new(10))
            .unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_second(rps)),
            clock: DefaultClock::default(),
        }
    }

    /// Take one request from `uid`'s budget, or report how long to wait.
    pub fn check(&self, uid: &str) -> Result<(), Duration> {
        self.limiter
            .check_key(&uid.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Number of users currently holding a budget.
    pub fn tracked_users(&self) -> usize {
        self.limiter.len()
    }

    /// Forget users whose budget has fully refilled.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Prune idle users every `every` for the life of the process.
    pub fn spawn_pruning(limits: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                limits.prune();
                debug!(users = limits.tracked_users(), "Pruned rate limit budgets");
            }
        })
    }
}

/// CORS for browser clients sending bearer tokens.
///
/// Credentials (cookies) are never needed, so an explicit origin list only
/// narrows who may call; `*` keeps the API open.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER), header::RETRY_AFTER])
        .max_age(Duration::from_secs(600));

    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(origins)
    }
}

/// Headers for a JSON API serving per-user data.
pub async fn security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    response
}

/// Swap internal error detail for a generic message when `hide` is set.
pub async fn hide_internal_errors(
    State(hide): State<bool>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let response = next.run(request).await;

    if hide && response.extensions().get::<InternalErrorDetail>().is_some() {
        return redacted_internal_error();
    }

    response
}

/// One log line per request, keyed by request id and route template.
///
/// Expects the request id to be set by an outer `SetRequestIdLayer`.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    if matches!(route.as_str(), "/health" | "/healthz" | "/ready" | "/metrics") {
        return response;
    }

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;
    if status.is_server_error() {
        warn!(%method, %route, %status, duration_ms, %request_id, "Request failed");
    } else {
        info!(%method, %route, %status, duration_ms, %request_id, "Request completed");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_is_per_user() {
        let limits = UserRateLimits::new(2);

        assert!(limits.check("alice").is_ok());
        assert!(limits.check("alice").is_ok());
        let wait = limits.check("alice").unwrap_err();
        assert!(wait <= Duration::from_secs(1));

        assert!(limits.check("bob").is_ok());
        assert_eq!(limits.tracked_users(), 2);
    }

    #[test]
    fn test_zero_rate_falls_back() {
        let limits = UserRateLimits::new(0);
        for _ in 0..10 {
            assert!(limits.check("alice").is_ok());
        }
        assert!(limits.check("alice").is_err());
    }
}
