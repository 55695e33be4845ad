//! Edusync - school management service.
//!
//! Students, teachers, courses, classes, enrollments, grades and
//! attendance behind a role-gated JSON API.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: School records, identity types and their rules
//! - **services**: Workflows (enrollment, grading, attendance, roles)
//! - **infra**: Database, migrations, repositories and the unit of work
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Create roles and an Admin account
//! edusync seed --admin-username principal --admin-email p@school.test --admin-password Secret123
//!
//! # Start the server
//! edusync serve
//!
//! # Run migrations
//! edusync migrate up
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
pub use domain::{Password, Role, User};
pub use errors::{AppError, AppResult};
pub use infra::Database;
