//! Shared data models for the job tracker backend.
//!
//! This crate provides Serde-serializable types for:
//! - Tracked job records and their notes
//! - Application status and per-status counts
//! - Create/update request payloads and their validation

pub mod requests;
pub mod status;
pub mod tracked_job;

// Re-export common types
pub use requests::{CreateTrackedJobRequest, NewTrackedJob, UpdateTrackedJobRequest};
pub use status::{JobStats, JobStatus, UnknownStatus};
pub use tracked_job::{
    TrackedJob, TrackedJobUpdate, TrackerId, TrackerNote, DEFAULT_JOB_TYPE, DEFAULT_LOCATION,
};
