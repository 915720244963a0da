//! Application state.

use std::sync::Arc;

use jobtrack_store::{InMemoryTrackedJobRepository, TrackedJobRepository};

use crate::auth::{verifier_from_config, TokenVerifier};
use crate::config::ApiConfig;
use crate::middleware::UserRateLimits;
use crate::services::TrackerService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub auth: Arc<dyn TokenVerifier>,
    pub rate_limits: Arc<UserRateLimits>,
    pub tracker: TrackerService,
}

impl AppState {
    /// Create application state backed by the in-memory store.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let auth = verifier_from_config(&config.auth).await?;
        let repo: Arc<dyn TrackedJobRepository> = Arc::new(InMemoryTrackedJobRepository::new());

        Ok(Self::with_parts(config, auth, repo))
    }

    /// Assemble state from already-built collaborators.
    pub fn with_parts(
        config: ApiConfig,
        auth: Arc<dyn TokenVerifier>,
        repo: Arc<dyn TrackedJobRepository>,
    ) -> Self {
        Self {
            rate_limits: Arc::new(UserRateLimits::new(config.rate_limit_rps)),
            config,
            auth,
            tracker: TrackerService::new(repo),
        }
    }
}
