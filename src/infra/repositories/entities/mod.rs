//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod boat;
pub mod boat_image;
pub mod city;
pub mod country;
pub mod district;
pub mod user;
pub mod user_credential;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use boat::{ActiveModel as BoatActiveModel, Entity as BoatEntity, Model as BoatModel};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
