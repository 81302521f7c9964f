//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, HealthCheck, RateLimitStore};
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Application services
    pub services: Arc<dyn ServiceContainer>,
    /// Request counters for rate limiting
    pub rate_limiter: Arc<dyn RateLimitStore>,
    /// Database liveness probe
    pub database: Arc<dyn HealthCheck>,
    /// Redis liveness probe
    pub cache: Arc<dyn HealthCheck>,
    /// Request body limit for multipart uploads
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create application state from live connections and config.
    pub fn from_config(database: Database, cache: Cache, config: Config) -> Self {
        let max_upload_bytes = config.max_upload_bytes;
        let services = Arc::new(Services::from_connection(database.get_connection(), config));
        let cache = Arc::new(cache);

        Self {
            services,
            rate_limiter: cache.clone(),
            database: Arc::new(database),
            cache,
            max_upload_bytes,
        }
    }

    /// Create application state with manually injected collaborators.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        rate_limiter: Arc<dyn RateLimitStore>,
        database: Arc<dyn HealthCheck>,
        cache: Arc<dyn HealthCheck>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            services,
            rate_limiter,
            database,
            cache,
            max_upload_bytes,
        }
    }
}
