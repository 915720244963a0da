//! Create/update payloads for tracked jobs.
//!
//! Payload fields arrive as loose strings so that a bad `status` or a missing
//! `title` is reported with a readable message instead of a JSON rejection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::status::JobStatus;
use crate::tracked_job::{TrackedJobUpdate, DEFAULT_JOB_TYPE, DEFAULT_LOCATION};

/// Body of `POST /api/tracked-jobs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrackedJobRequest {
    #[validate(length(max = 128, message = "jobId must be at most 128 characters"))]
    pub job_id: Option<String>,

    #[validate(length(max = 200, message = "title must be at most 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 200, message = "company must be at most 200 characters"))]
    pub company: Option<String>,

    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 200, message = "jobType must be at most 200 characters"))]
    pub job_type: Option<String>,

    #[validate(length(max = 200, message = "salary must be at most 200 characters"))]
    pub salary: Option<String>,

    #[validate(length(max = 2048, message = "applyLink must be at most 2048 characters"))]
    pub apply_link: Option<String>,

    #[validate(length(max = 10000, message = "description must be at most 10000 characters"))]
    pub description: Option<String>,

    pub status: Option<String>,
}

/// Validated, defaulted input for a new tracked job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrackedJob {
    pub job_id: Option<String>,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub salary: Option<String>,
    pub apply_link: Option<String>,
    pub description: Option<String>,
    pub status: JobStatus,
}

impl CreateTrackedJobRequest {
    /// Validate the payload, applying field defaults.
    ///
    /// Empty strings count as absent. `title` and `company` must also hold
    /// something other than whitespace.
    pub fn into_new_job(self) -> Result<NewTrackedJob, String> {
        let present = Self {
            job_id: non_empty(self.job_id),
            title: non_blank(self.title),
            company: non_blank(self.company),
            location: non_empty(self.location),
            job_type: non_empty(self.job_type),
            salary: non_empty(self.salary),
            apply_link: non_empty(self.apply_link),
            description: non_empty(self.description),
            status: non_empty(self.status),
        };

        let (Some(title), Some(company)) = (present.title.clone(), present.company.clone()) else {
            return Err("Title and company are required".to_string());
        };

        let status = match present.status.as_deref() {
            Some(s) => s.parse::<JobStatus>().map_err(|e| e.to_string())?,
            None => JobStatus::default(),
        };

        present.validate().map_err(|e| describe(&e))?;

        Ok(NewTrackedJob {
            job_id: present.job_id,
            title,
            company,
            location: present
                .location
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            job_type: present
                .job_type
                .unwrap_or_else(|| DEFAULT_JOB_TYPE.to_string()),
            salary: present.salary,
            apply_link: present.apply_link,
            description: present.description,
            status,
        })
    }
}

/// Body of `PUT /api/tracked-jobs/:tracker_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrackedJobRequest {
    pub status: Option<String>,

    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl UpdateTrackedJobRequest {
    /// Validate the payload into an update stamped with `at`.
    ///
    /// Note text is kept exactly as sent. An empty `notes` value adds no
    /// note; `updated_at` still moves.
    pub fn into_update(self, at: DateTime<Utc>) -> Result<TrackedJobUpdate, String> {
        let status = match self.status.as_deref() {
            Some(s) => Some(s.parse::<JobStatus>().map_err(|e| e.to_string())?),
            None => None,
        };

        self.validate().map_err(|e| describe(&e))?;

        Ok(TrackedJobUpdate {
            status,
            note: non_empty(self.notes),
            at,
        })
    }
}

fn non_empty(input: Option<String>) -> Option<String> {
    input.filter(|s| !s.is_empty())
}

/// Whitespace-only counts as missing for required fields.
fn non_blank(input: Option<String>) -> Option<String> {
    input.filter(|s| !s.trim().is_empty())
}

/// Flatten validator output into one message, stable across runs.
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: Option<&str>, company: Option<&str>) -> CreateTrackedJobRequest {
        CreateTrackedJobRequest {
            title: title.map(str::to_string),
            company: company.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_request_gets_defaults() {
        let job = request(Some("Backend Engineer"), Some("Acme"))
            .into_new_job()
            .unwrap();

        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.company, "Acme");
        assert_eq!(job.location, "Remote");
        assert_eq!(job.job_type, "Full-time");
        assert_eq!(job.status, JobStatus::Saved);
        assert_eq!(job.job_id, None);
        assert_eq!(job.salary, None);
    }

    #[test]
    fn test_missing_title_or_company_rejected() {
        let err = request(None, Some("Acme")).into_new_job().unwrap_err();
        assert_eq!(err, "Title and company are required");

        assert!(request(Some("Engineer"), None).into_new_job().is_err());
        assert!(request(Some("   "), Some("Acme")).into_new_job().is_err());
        assert!(request(Some("Engineer"), Some("")).into_new_job().is_err());
    }

    #[test]
    fn test_create_with_invalid_status_rejected() {
        let mut req = request(Some("Engineer"), Some("Acme"));
        req.status = Some("ghosted".to_string());
        let err = req.into_new_job().unwrap_err();
        assert!(err.contains("Invalid status 'ghosted'"));
    }

    #[test]
    fn test_create_with_explicit_status() {
        let mut req = request(Some("Engineer"), Some("Acme"));
        req.status = Some("applied".to_string());
        assert_eq!(req.into_new_job().unwrap().status, JobStatus::Applied);
    }

    #[test]
    fn test_empty_job_id_treated_as_absent() {
        let mut req = request(Some("Engineer"), Some("Acme"));
        req.job_id = Some(String::new());
        assert_eq!(req.into_new_job().unwrap().job_id, None);

        let mut req = request(Some("Engineer"), Some("Acme"));
        req.job_id = Some("  ".to_string());
        assert_eq!(req.into_new_job().unwrap().job_id.as_deref(), Some("  "));
    }

    #[test]
    fn test_overlong_title_rejected() {
        let long = "x".repeat(201);
        let err = request(Some(&long), Some("Acme")).into_new_job().unwrap_err();
        assert_eq!(err, "title must be at most 200 characters");
    }

    #[test]
    fn test_empty_optional_fields_get_defaults() {
        let mut req = request(Some("Engineer"), Some("Acme"));
        req.location = Some(String::new());
        req.job_type = Some(String::new());
        req.status = Some(String::new());

        let job = req.into_new_job().unwrap();
        assert_eq!(job.location, "Remote");
        assert_eq!(job.job_type, "Full-time");
        assert_eq!(job.status, JobStatus::Saved);
    }

    #[test]
    fn test_update_parses_status_and_note() {
        let at = Utc::now();
        let update = UpdateTrackedJobRequest {
            status: Some("interviewing".to_string()),
            notes: Some("called recruiter".to_string()),
        }
        .into_update(at)
        .unwrap();

        assert_eq!(update.status, Some(JobStatus::Interviewing));
        assert_eq!(update.note.as_deref(), Some("called recruiter"));
        assert_eq!(update.at, at);
    }

    #[test]
    fn test_update_with_empty_notes_adds_nothing() {
        let at = Utc::now();
        let update = UpdateTrackedJobRequest {
            status: None,
            notes: Some(String::new()),
        }
        .into_update(at)
        .unwrap();

        assert_eq!(update, TrackedJobUpdate::touch(at));
    }

    #[test]
    fn test_update_keeps_note_text_verbatim() {
        let at = Utc::now();
        let padded = UpdateTrackedJobRequest {
            status: None,
            notes: Some("  called\u{0007} recruiter  ".to_string()),
        }
        .into_update(at)
        .unwrap();
        assert_eq!(padded.note.as_deref(), Some("  called\u{0007} recruiter  "));

        let spaces = UpdateTrackedJobRequest {
            status: None,
            notes: Some("   ".to_string()),
        }
        .into_update(at)
        .unwrap();
        assert_eq!(spaces.note.as_deref(), Some("   "));
    }

    #[test]
    fn test_update_with_bogus_status_rejected() {
        let err = UpdateTrackedJobRequest {
            status: Some("bogus".to_string()),
            notes: None,
        }
        .into_update(Utc::now())
        .unwrap_err();
        assert!(err.starts_with("Invalid status 'bogus'"));
    }

    #[test]
    fn test_overlong_note_rejected() {
        let err = UpdateTrackedJobRequest {
            status: None,
            notes: Some("n".repeat(2001)),
        }
        .into_update(Utc::now())
        .unwrap_err();
        assert_eq!(err, "notes must be at most 2000 characters");
    }

    #[test]
    fn test_request_accepts_camel_case_json() {
        let req: CreateTrackedJobRequest = serde_json::from_value(serde_json::json!({
            "jobId": "abc",
            "title": "Engineer",
            "company": "Acme",
            "jobType": "Contract",
            "applyLink": "https://example.com/apply"
        }))
        .unwrap();

        let job = req.into_new_job().unwrap();
        assert_eq!(job.job_id.as_deref(), Some("abc"));
        assert_eq!(job.job_type, "Contract");
        assert_eq!(job.apply_link.as_deref(), Some("https://example.com/apply"));
    }
}
