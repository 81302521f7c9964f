//! Service Container - Centralized service access.
//!
//! Handlers depend on `ServiceContainer` rather than on concrete services,
//! so the router can be driven with in-memory implementations in tests.

use std::future::Future;
use std::sync::Arc;

use super::{AuthService, BoatService, GeographyService, UserService};
use crate::config::Config;
use crate::domain::CredentialManager;
use crate::errors::AppResult;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get boat listing service
    fn boats(&self) -> Arc<dyn BoatService>;

    /// Get location lookup service
    fn geography(&self) -> Arc<dyn GeographyService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    boat_service: Arc<dyn BoatService>,
    geography_service: Arc<dyn GeographyService>,
}

impl Services {
    /// Create a new service container from already-built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        boat_service: Arc<dyn BoatService>,
        geography_service: Arc<dyn GeographyService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            boat_service,
            geography_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{Authenticator, BoatManager, GeographyLookup, UserManager};

        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(
                uow.clone(),
                CredentialManager::default(),
                config,
            )),
            user_service: Arc::new(UserManager::new(uow.clone())),
            boat_service: Arc::new(BoatManager::new(uow.clone())),
            geography_service: Arc::new(GeographyLookup::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn boats(&self) -> Arc<dyn BoatService> {
        self.boat_service.clone()
    }

    fn geography(&self) -> Arc<dyn GeographyService> {
        self.geography_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }
}
