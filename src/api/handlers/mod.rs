//! HTTP request handlers.

pub mod auth_handler;
pub mod boat_handler;
pub mod geography_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use boat_handler::{boat_owner_routes, boat_routes};
pub use geography_handler::geography_routes;
pub use user_handler::{password_routes, user_routes};
