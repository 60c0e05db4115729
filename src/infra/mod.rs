//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection, migrations and the credential store
//! - Redis connection and the token revocation list
//! - In-memory backends for single-process runs and tests

pub mod cache;
pub mod db;
pub mod repositories;
pub mod revocation;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{MemoryUserStore, UserRepository, UserStore};
pub use revocation::{MemoryRevocationList, RedisRevocationList, RevocationList};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use revocation::MockRevocationList;
