//! Application state - Dependency injection container.
//!
//! Built once at startup and cloned into every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{AuthService, ServiceContainer};
use crate::utils::CookieOptions;

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Database connection, absent for in-memory runs
    pub database: Option<Arc<Database>>,
    /// Redis cache, absent for in-memory runs
    pub cache: Option<Arc<Cache>>,
    /// Session cookie attributes
    pub cookies: CookieOptions,
}

impl AppState {
    /// Create application state with an injected auth service.
    pub fn new(auth_service: Arc<dyn AuthService>, config: &Config) -> Self {
        Self {
            auth_service,
            database: None,
            cache: None,
            cookies: CookieOptions {
                secure: config.cookie_secure,
            },
        }
    }

    /// Create application state from a service container.
    pub fn from_services(services: &dyn ServiceContainer, config: &Config) -> Self {
        Self::new(services.auth(), config)
    }

    /// Attach the external backends so the health check can probe them.
    pub fn with_backends(mut self, database: Arc<Database>, cache: Arc<Cache>) -> Self {
        self.database = Some(database);
        self.cache = Some(cache);
        self
    }
}
