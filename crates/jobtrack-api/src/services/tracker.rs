//! Tracked job service: ownership checks, validation and ordering on top of
//! the injected repository.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use jobtrack_models::{
    CreateTrackedJobRequest, JobStats, TrackedJob, TrackerId, UpdateTrackedJobRequest,
};
use jobtrack_store::TrackedJobRepository;

use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Tracked job operations for authenticated callers.
#[derive(Clone)]
pub struct TrackerService {
    repo: Arc<dyn TrackedJobRepository>,
}

impl TrackerService {
    /// Create a new tracker service.
    pub fn new(repo: Arc<dyn TrackedJobRepository>) -> Self {
        Self { repo }
    }

    /// All of the caller's tracked jobs, newest first.
    pub async fn list(&self, uid: &str) -> ApiResult<Vec<TrackedJob>> {
        let mut jobs = self.repo.list_by_owner(uid).await?;
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!("Listed {} tracked jobs for uid={}", jobs.len(), uid);
        Ok(jobs)
    }

    /// Per-status counts of the caller's tracked jobs.
    pub async fn stats(&self, uid: &str) -> ApiResult<JobStats> {
        let jobs = self.repo.list_by_owner(uid).await?;
        Ok(jobs.into_iter().map(|job| job.status).collect())
    }

    /// Start tracking a job for the caller.
    pub async fn create(&self, uid: &str, request: CreateTrackedJobRequest) -> ApiResult<TrackedJob> {
        let input = request.into_new_job().map_err(ApiError::validation)?;
        let job = TrackedJob::create(uid, input, Utc::now());

        let job = self.repo.insert_unique(job).await?;

        info!(
            "Created tracked job: tracker_id={}, job_id={}, uid={}",
            job.id, job.job_id, uid
        );
        metrics::record_tracked_job_created(job.status.as_str());
        Ok(job)
    }

    /// Fetch one of the caller's tracked jobs.
    pub async fn get(&self, uid: &str, tracker_id: &TrackerId) -> ApiResult<TrackedJob> {
        self.owned(uid, tracker_id).await
    }

    /// Change status and/or append a note.
    ///
    /// Existence is checked before ownership, and only then is the payload
    /// read and validated.
    pub async fn update<F>(
        &self,
        uid: &str,
        tracker_id: &TrackerId,
        read_request: F,
    ) -> ApiResult<TrackedJob>
    where
        F: FnOnce() -> ApiResult<UpdateTrackedJobRequest>,
    {
        self.owned(uid, tracker_id).await?;

        let update = read_request()?
            .into_update(Utc::now())
            .map_err(ApiError::validation)?;
        let added_note = update.note.is_some();

        let job = self.repo.update(tracker_id, update).await?;

        info!(
            "Updated tracked job: tracker_id={}, status={}, note_added={}, uid={}",
            job.id, job.status, added_note, uid
        );
        metrics::record_tracked_job_updated(job.status.as_str());
        Ok(job)
    }

    /// Stop tracking one of the caller's jobs.
    pub async fn delete(&self, uid: &str, tracker_id: &TrackerId) -> ApiResult<()> {
        self.owned(uid, tracker_id).await?;
        self.repo.delete(tracker_id).await?;

        info!("Deleted tracked job: tracker_id={}, uid={}", tracker_id, uid);
        metrics::record_tracked_job_deleted();
        Ok(())
    }

    /// Number of records across all users.
    pub async fn count(&self) -> ApiResult<usize> {
        Ok(self.repo.count().await?)
    }

    async fn owned(&self, uid: &str, tracker_id: &TrackerId) -> ApiResult<TrackedJob> {
        let job = self
            .repo
            .get(tracker_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Tracked job not found"))?;

        if !job.is_owned_by(uid) {
            return Err(ApiError::forbidden("Not authorized to access this tracked job"));
        }

        Ok(job)
    }
}
