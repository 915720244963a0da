//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "jobtrack_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jobtrack_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "jobtrack_http_requests_in_flight";

    // Tracker metrics
    pub const TRACKED_JOBS_CREATED_TOTAL: &str = "jobtrack_tracked_jobs_created_total";
    pub const TRACKED_JOBS_UPDATED_TOTAL: &str = "jobtrack_tracked_jobs_updated_total";
    pub const TRACKED_JOBS_DELETED_TOTAL: &str = "jobtrack_tracked_jobs_deleted_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "jobtrack_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a tracked job creation.
pub fn record_tracked_job_created(status: &str) {
    let labels = [("status", status.to_string())];
    counter!(names::TRACKED_JOBS_CREATED_TOTAL, &labels).increment(1);
}

/// Record a tracked job update, labelled with the resulting status.
pub fn record_tracked_job_updated(status: &str) {
    let labels = [("status", status.to_string())];
    counter!(names::TRACKED_JOBS_UPDATED_TOTAL, &labels).increment(1);
}

/// Record a tracked job deletion.
pub fn record_tracked_job_deleted() {
    counter!(names::TRACKED_JOBS_DELETED_TOTAL).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels (collapse tracker IDs).
fn sanitize_path(path: &str) -> String {
    let mut previous = "";
    path.split('/')
        .map(|segment| {
            let label = if previous == "tracked-jobs" && !segment.is_empty() && segment != "stats" {
                ":tracker_id"
            } else {
                segment
            };
            previous = segment;
            label
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/tracked-jobs/550e8400-e29b-41d4-a716-446655440000"),
            "/api/tracked-jobs/:tracker_id"
        );
        assert_eq!(sanitize_path("/api/tracked-jobs/stats"), "/api/tracked-jobs/stats");
        assert_eq!(sanitize_path("/api/tracked-jobs"), "/api/tracked-jobs");
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
