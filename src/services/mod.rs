//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access; multi-row writes are atomic inside the repositories.

mod auth_service;
mod boat_service;
pub mod container;
mod geography_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, Registration, TokenResponse};
pub use boat_service::{BoatManager, BoatService};
pub use geography_service::{GeographyLookup, GeographyService};
pub use user_service::{UserManager, UserService};

pub use container::parallel;

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
