//! Request handlers.

pub mod health;
pub mod tracked_jobs;

pub use health::*;
pub use tracked_jobs::*;
