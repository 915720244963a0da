//! Tracked job storage.
//!
//! This crate provides:
//! - The `TrackedJobRepository` trait that handlers depend on
//! - An in-memory backend keyed by tracker ID
//! - Storage error types

pub mod error;
pub mod memory;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryTrackedJobRepository;
pub use repository::TrackedJobRepository;
