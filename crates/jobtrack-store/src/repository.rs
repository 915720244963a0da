//! Storage abstraction for tracked jobs.

use async_trait::async_trait;

use jobtrack_models::{TrackedJob, TrackedJobUpdate, TrackerId};

use crate::error::StoreResult;

/// Backing store for tracked job records.
///
/// Implementations must make `insert_unique` and `update` atomic with respect
/// to other writers: the per-owner `job_id` check and the insert happen as one
/// step, and concurrent updates to one record never drop each other's notes.
#[async_trait]
pub trait TrackedJobRepository: Send + Sync {
    /// Fetch a record by tracker ID.
    async fn get(&self, id: &TrackerId) -> StoreResult<Option<TrackedJob>>;

    /// All records owned by `user_id`, in no particular order.
    async fn list_by_owner(&self, user_id: &str) -> StoreResult<Vec<TrackedJob>>;

    /// Insert a record unless its tracker ID is taken or its owner already
    /// tracks the same `job_id`.
    async fn insert_unique(&self, job: TrackedJob) -> StoreResult<TrackedJob>;

    /// Apply an update to an existing record and return the new state.
    async fn update(&self, id: &TrackerId, update: TrackedJobUpdate) -> StoreResult<TrackedJob>;

    /// Remove a record permanently.
    async fn delete(&self, id: &TrackerId) -> StoreResult<()>;

    /// Number of stored records.
    async fn count(&self) -> StoreResult<usize>;
}
