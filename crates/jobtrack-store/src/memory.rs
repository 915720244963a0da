//! In-memory tracked job store.
//!
//! State lives for the lifetime of the process. Writers hold the write lock
//! across their check-and-mutate step.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use jobtrack_models::{TrackedJob, TrackedJobUpdate, TrackerId};

use crate::error::{StoreError, StoreResult};
use crate::repository::TrackedJobRepository;

/// Tracked jobs held in a map keyed by tracker ID.
#[derive(Default)]
pub struct InMemoryTrackedJobRepository {
    jobs: RwLock<HashMap<TrackerId, TrackedJob>>,
}

impl InMemoryTrackedJobRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrackedJobRepository for InMemoryTrackedJobRepository {
    async fn get(&self, id: &TrackerId) -> StoreResult<Option<TrackedJob>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn list_by_owner(&self, user_id: &str) -> StoreResult<Vec<TrackedJob>> {
        let jobs = self.jobs.read().await;
        Ok(jobs
            .values()
            .filter(|job| job.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    async fn insert_unique(&self, job: TrackedJob) -> StoreResult<TrackedJob> {
        let mut jobs = self.jobs.write().await;

        if jobs.contains_key(&job.id) {
            return Err(StoreError::AlreadyExists(job.id.to_string()));
        }

        let duplicate = jobs
            .values()
            .any(|existing| existing.user_id == job.user_id && existing.job_id == job.job_id);
        if duplicate {
            return Err(StoreError::duplicate_job_id(job.job_id));
        }

        jobs.insert(job.id.clone(), job.clone());
        debug!("Inserted tracked job {} ({} total)", job.id, jobs.len());
        Ok(job)
    }

    async fn update(&self, id: &TrackerId, update: TrackedJobUpdate) -> StoreResult<TrackedJob> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(id).ok_or_else(|| StoreError::not_found(id.as_str()))?;
        job.apply(update);
        Ok(job.clone())
    }

    async fn delete(&self, id: &TrackerId) -> StoreResult<()> {
        let mut jobs = self.jobs.write().await;
        match jobs.remove(id) {
            Some(_) => {
                debug!("Removed tracked job {} ({} left)", id, jobs.len());
                Ok(())
            }
            None => Err(StoreError::not_found(id.as_str())),
        }
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.jobs.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use jobtrack_models::{CreateTrackedJobRequest, JobStatus};

    use super::*;

    fn new_job(user_id: &str, job_id: Option<&str>) -> TrackedJob {
        let input = CreateTrackedJobRequest {
            job_id: job_id.map(str::to_string),
            title: Some("Engineer".to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        }
        .into_new_job()
        .unwrap();
        TrackedJob::create(user_id, input, Utc::now())
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = InMemoryTrackedJobRepository::new();
        let job = repo.insert_unique(new_job("alice", None)).await.unwrap();

        let fetched = repo.get(&job.id).await.unwrap().unwrap();
        assert_eq!(fetched, job);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_job_id_for_same_owner_rejected() {
        let repo = InMemoryTrackedJobRepository::new();
        repo.insert_unique(new_job("alice", Some("ext-1"))).await.unwrap();

        let err = repo
            .insert_unique(new_job("alice", Some("ext-1")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateJobId { ref job_id } if job_id == "ext-1"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_same_job_id_for_different_owners_allowed() {
        let repo = InMemoryTrackedJobRepository::new();
        repo.insert_unique(new_job("alice", Some("ext-1"))).await.unwrap();
        repo.insert_unique(new_job("bob", Some("ext-1"))).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reinserting_same_tracker_id_rejected() {
        let repo = InMemoryTrackedJobRepository::new();
        let job = repo.insert_unique(new_job("alice", None)).await.unwrap();

        let mut copy = job.clone();
        copy.job_id = "something-else".to_string();
        let err = repo.insert_unique(copy).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_list_by_owner_filters() {
        let repo = InMemoryTrackedJobRepository::new();
        repo.insert_unique(new_job("alice", None)).await.unwrap();
        repo.insert_unique(new_job("alice", None)).await.unwrap();
        repo.insert_unique(new_job("bob", None)).await.unwrap();

        let alice = repo.list_by_owner("alice").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|j| j.user_id == "alice"));
        assert!(repo.list_by_owner("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_applies_in_place() {
        let repo = InMemoryTrackedJobRepository::new();
        let job = repo.insert_unique(new_job("alice", None)).await.unwrap();
        let at = Utc::now();

        let updated = repo
            .update(
                &job.id,
                TrackedJobUpdate {
                    status: Some(JobStatus::Offered),
                    note: Some("offer call".to_string()),
                    at,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, JobStatus::Offered);
        assert_eq!(updated.notes.len(), 1);
        assert_eq!(repo.get(&job.id).await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let repo = InMemoryTrackedJobRepository::new();
        let err = repo
            .update(&TrackerId::new(), TrackedJobUpdate::touch(Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = InMemoryTrackedJobRepository::new();
        let job = repo.insert_unique(new_job("alice", None)).await.unwrap();

        repo.delete(&job.id).await.unwrap();
        assert!(repo.get(&job.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&job.id).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_keep_job_id_unique() {
        let repo = Arc::new(InMemoryTrackedJobRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.insert_unique(new_job("alice", Some("ext-1"))).await })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_note_appends_are_not_lost() {
        let repo = Arc::new(InMemoryTrackedJobRepository::new());
        let job = repo.insert_unique(new_job("alice", None)).await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let repo = Arc::clone(&repo);
                let id = job.id.clone();
                tokio::spawn(async move {
                    repo.update(
                        &id,
                        TrackedJobUpdate {
                            status: None,
                            note: Some(format!("note {}", i)),
                            at: Utc::now(),
                        },
                    )
                    .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = repo.get(&job.id).await.unwrap().unwrap();
        assert_eq!(stored.notes.len(), 20);
    }
}
