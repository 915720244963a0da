//! Application status and aggregate counts.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where an application currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Bookmarked, not applied yet
    #[default]
    Saved,
    /// Application submitted
    Applied,
    /// In the interview loop
    Interviewing,
    /// Offer received
    Offered,
    /// Turned down (either side)
    Rejected,
}

impl JobStatus {
    /// Every status, in pipeline order.
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Saved,
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offered,
        JobStatus::Rejected,
    ];

    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Saved => "saved",
            JobStatus::Applied => "applied",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Offered => "offered",
            JobStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a string does not name a [`JobStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid status '{0}'. Must be one of: saved, applied, interviewing, offered, rejected")]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Per-status counts for one user's tracked jobs.
///
/// Zero counts are always serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobStats {
    pub total: u32,
    pub saved: u32,
    pub applied: u32,
    pub interviewing: u32,
    pub offered: u32,
    pub rejected: u32,
}

impl JobStats {
    /// Count one record with the given status.
    pub fn record(&mut self, status: JobStatus) {
        self.total += 1;
        match status {
            JobStatus::Saved => self.saved += 1,
            JobStatus::Applied => self.applied += 1,
            JobStatus::Interviewing => self.interviewing += 1,
            JobStatus::Offered => self.offered += 1,
            JobStatus::Rejected => self.rejected += 1,
        }
    }
}

impl FromIterator<JobStatus> for JobStats {
    fn from_iter<I: IntoIterator<Item = JobStatus>>(iter: I) -> Self {
        let mut stats = JobStats::default();
        for status in iter {
            stats.record(status);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in JobStatus::ALL {
            assert_eq!(status.as_str().parse::<JobStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = "bogus".parse::<JobStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("bogus".to_string()));
        assert!("Saved".parse::<JobStatus>().is_err());
        assert!("".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&JobStatus::Interviewing).unwrap();
        assert_eq!(json, "\"interviewing\"");
    }

    #[test]
    fn test_stats_from_statuses() {
        let stats: JobStats = [
            JobStatus::Saved,
            JobStatus::Saved,
            JobStatus::Applied,
            JobStatus::Rejected,
        ]
        .into_iter()
        .collect();

        assert_eq!(
            stats,
            JobStats {
                total: 4,
                saved: 2,
                applied: 1,
                interviewing: 0,
                offered: 0,
                rejected: 1,
            }
        );
    }

    #[test]
    fn test_empty_stats_serialize_zeroes() {
        let value = serde_json::to_value(JobStats::default()).unwrap();
        assert_eq!(value["total"], 0);
        assert_eq!(value["interviewing"], 0);
        assert_eq!(value.as_object().unwrap().len(), 6);
    }
}
