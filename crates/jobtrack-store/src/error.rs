//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Tracked job not found: {0}")]
    NotFound(String),

    #[error("Tracked job already exists: {0}")]
    AlreadyExists(String),

    #[error("Job {job_id} is already tracked by this user")]
    DuplicateJobId { job_id: String },
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn duplicate_job_id(job_id: impl Into<String>) -> Self {
        Self::DuplicateJobId {
            job_id: job_id.into(),
        }
    }
}
