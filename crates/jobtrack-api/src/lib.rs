//! Axum HTTP API server for the job tracker.
//!
//! This crate provides:
//! - CRUD and stats endpoints for tracked job applications
//! - Firebase ID token (or shared-secret HS256) verification
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, AuthConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::TrackerService;
pub use state::AppState;
