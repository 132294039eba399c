//! Service desk API - Municipal service-request management backend.
//!
//! Citizens open service requests against registered locations; admins
//! triage them and staff accounts see only their own location's queue.
//! Attachments live in external blob storage, admins are notified of new
//! requests by email.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, blob storage, cache)
//! - **jobs**: Detached background work (notifications)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Account, Password, Role, ServiceRequest, User};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
