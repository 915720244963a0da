//! Tracked job records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::requests::NewTrackedJob;
use crate::status::JobStatus;

/// Location used when the caller does not give one.
pub const DEFAULT_LOCATION: &str = "Remote";

/// Job type used when the caller does not give one.
pub const DEFAULT_JOB_TYPE: &str = "Full-time";

/// Server-generated identifier of a tracked job record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TrackerId(pub String);

impl TrackerId {
    /// Generate a new random tracker ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TrackerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TrackerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TrackerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A free-text note attached to a tracked job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackerNote {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A job application tracked by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackedJob {
    /// Tracker ID (store key)
    pub id: TrackerId,

    /// Owner UID
    pub user_id: String,

    /// External job reference, unique per owner
    pub job_id: String,

    pub title: String,

    pub company: String,

    pub location: String,

    pub job_type: String,

    pub salary: Option<String>,

    pub apply_link: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub status: JobStatus,

    /// Append-only, oldest first
    #[serde(default)]
    pub notes: Vec<TrackerNote>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl TrackedJob {
    /// Build a fresh record owned by `user_id` from validated input.
    ///
    /// A missing `job_id` falls back to the generated tracker ID.
    pub fn create(user_id: impl Into<String>, input: NewTrackedJob, now: DateTime<Utc>) -> Self {
        let id = TrackerId::new();
        let job_id = input.job_id.unwrap_or_else(|| id.as_str().to_string());

        Self {
            id,
            user_id: user_id.into(),
            job_id,
            title: input.title,
            company: input.company,
            location: input.location,
            job_type: input.job_type,
            salary: input.salary,
            apply_link: input.apply_link,
            description: input.description,
            status: input.status,
            notes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `uid` owns this record.
    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.user_id == uid
    }

    /// Apply an update in place.
    pub fn apply(&mut self, update: TrackedJobUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(text) = update.note {
            self.notes.push(TrackerNote {
                text,
                created_at: update.at,
            });
        }
        self.updated_at = update.at;
    }
}

/// A validated mutation of a tracked job.
///
/// `updated_at` is always moved to `at`, even when nothing else changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedJobUpdate {
    pub status: Option<JobStatus>,
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

impl TrackedJobUpdate {
    /// An update that only touches `updated_at`.
    pub fn touch(at: DateTime<Utc>) -> Self {
        Self {
            status: None,
            note: None,
            at,
        }
    }
}
