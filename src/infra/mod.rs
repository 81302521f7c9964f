//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories (SeaORM)
//! - Redis-backed rate limit counters
//! - Unit of Work as the single repository access point

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, RateLimitStore};
pub use db::{Database, HealthCheck, Migrator};
pub use repositories::{
    BoatRepository, BoatStore, CredentialRepository, CredentialStore, GeographyRepository,
    GeographyStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockRateLimitStore;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBoatRepository, MockCredentialRepository, MockGeographyRepository, MockUserRepository,
};
