//! StaffDesk Common Library
//!
//! Shared code for the StaffDesk console including:
//! - Remote data service (REST transport, typed calls, list queries)
//! - Entity models for clients, subcontractors, employees, and their records
//! - Error types and handling
//! - Configuration management
//! - Client-side validation
//! - Metrics

pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use api::{RemoteService, Resource};
pub use config::AppConfig;
pub use errors::{AppError, FieldErrors, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
