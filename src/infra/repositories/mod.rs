//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod boat_repository;
mod credential_repository;
pub(crate) mod entities;
mod geography_repository;
mod user_repository;

pub use boat_repository::{BoatRepository, BoatStore};
pub use credential_repository::{CredentialRepository, CredentialStore};
pub use geography_repository::{GeographyRepository, GeographyStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use boat_repository::MockBoatRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use credential_repository::MockCredentialRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use geography_repository::MockGeographyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
