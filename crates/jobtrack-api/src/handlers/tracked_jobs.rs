//! Tracked job API handlers.
//!
//! Every route is scoped to the authenticated caller:
//! - `GET /api/tracked-jobs` lists the caller's jobs, newest first
//! - `GET /api/tracked-jobs/stats` counts them per status
//! - `POST /api/tracked-jobs` starts tracking a job
//! - `GET|PUT|DELETE /api/tracked-jobs/:tracker_id` act on one record

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Serialize;
use tracing::info;

use jobtrack_models::{
    CreateTrackedJobRequest, JobStats, TrackedJob, TrackerId, UpdateTrackedJobRequest,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Types
// ============================================================================

/// Response for the list endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedJobListResponse {
    pub success: bool,
    pub tracked_jobs: Vec<TrackedJob>,
    pub count: usize,
}

/// Response for the stats endpoint.
#[derive(Debug, Serialize)]
pub struct TrackedJobStatsResponse {
    pub success: bool,
    pub stats: JobStats,
}

/// Response carrying a single record.
#[derive(Debug, Serialize)]
pub struct TrackedJobResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: TrackedJob,
}

/// Acknowledgment without data.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/tracked-jobs
pub async fn list_tracked_jobs(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<TrackedJobListResponse>> {
    let tracked_jobs = state.tracker.list(&user.uid).await?;

    Ok(Json(TrackedJobListResponse {
        success: true,
        count: tracked_jobs.len(),
        tracked_jobs,
    }))
}

/// GET /api/tracked-jobs/stats
pub async fn get_tracked_job_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<TrackedJobStatsResponse>> {
    let stats = state.tracker.stats(&user.uid).await?;

    Ok(Json(TrackedJobStatsResponse {
        success: true,
        stats,
    }))
}

/// POST /api/tracked-jobs
///
/// Returns:
/// - 201: The new record
/// - 400: Missing title/company, invalid status, or job already tracked
/// - 401: Not authenticated
pub async fn create_tracked_job(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Json(request), _): WithRejection<Json<CreateTrackedJobRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<TrackedJobResponse>)> {
    info!("create_tracked_job uid={} job_id={:?}", user.uid, request.job_id);

    let job = state.tracker.create(&user.uid, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(TrackedJobResponse {
            success: true,
            message: Some("Job added to tracker".to_string()),
            data: job,
        }),
    ))
}

/// GET /api/tracked-jobs/:tracker_id
pub async fn get_tracked_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(tracker_id): Path<String>,
) -> ApiResult<Json<TrackedJobResponse>> {
    let job = state
        .tracker
        .get(&user.uid, &TrackerId::from(tracker_id))
        .await?;

    Ok(Json(TrackedJobResponse {
        success: true,
        message: None,
        data: job,
    }))
}

/// PUT /api/tracked-jobs/:tracker_id
///
/// The body is optional; an absent or empty body only refreshes `updatedAt`.
/// Body problems are reported after existence and ownership.
///
/// Returns:
/// - 200: The updated record
/// - 400: Invalid status or malformed JSON
/// - 401: Not authenticated
/// - 403: Record belongs to another user
/// - 404: Record not found
pub async fn update_tracked_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(tracker_id): Path<String>,
    WithRejection(body, _): WithRejection<Bytes, ApiError>,
) -> ApiResult<Json<TrackedJobResponse>> {
    let tracker_id = TrackerId::from(tracker_id);

    let job = state
        .tracker
        .update(&user.uid, &tracker_id, || parse_update_body(&body))
        .await?;

    info!(
        "update_tracked_job uid={} tracker_id={} status={}",
        user.uid, tracker_id, job.status
    );

    Ok(Json(TrackedJobResponse {
        success: true,
        message: Some("Tracked job updated".to_string()),
        data: job,
    }))
}

fn parse_update_body(body: &[u8]) -> ApiResult<UpdateTrackedJobRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UpdateTrackedJobRequest::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Failed to parse the request body as JSON: {}", e)))
}

/// DELETE /api/tracked-jobs/:tracker_id
pub async fn delete_tracked_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(tracker_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    info!("delete_tracked_job uid={} tracker_id={}", user.uid, tracker_id);

    state
        .tracker
        .delete(&user.uid, &TrackerId::from(tracker_id))
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Job removed from tracker".to_string(),
    }))
}
