//! Boat Rental API
//!
//! Listing backend for a boat rental marketplace: owner accounts with
//! salted HMAC-SHA512 credentials, boat listings carrying up to five images,
//! and read-only location lookups.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, credential manager and image ingestion rules
//! - **services**: Application use cases
//! - **infra**: Database, migrations, repositories and Redis counters
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
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
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Credential, CredentialManager, User, UserType};
pub use errors::{AppError, AppResult};
