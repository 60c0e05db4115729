//! Skincare tracker authentication backend.
//!
//! Registration, login and logout over a persistent credential store, with
//! Argon2id password hashing, signed session tokens and a revocation list.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **services**: Auth use cases, token handling and notifications
//! - **infra**: Database, Redis and in-memory backends
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **utils**: Cookie helpers
//! - **errors**: Centralized error handling
//!
//! Business types live in the workspace `domain` crate.
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server against PostgreSQL and Redis
//! cargo run -- serve
//!
//! # Start with in-memory backends
//! cargo run -- serve --in-memory
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use services::{AuthService, Services};
