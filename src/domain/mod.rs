//! Domain layer - Core business entities and logic
//!
//! Credentials and image ingestion are pure: no I/O beyond drawing random
//! bytes. Persistence of what they produce belongs to the infra layer.

pub mod boat;
pub mod geography;
pub mod image;
pub mod password;
pub mod user;

pub use boat::{
    Boat, BoatDetails, BoatFields, BoatFilter, BoatImageResponse, BoatResponse, NewBoat,
};
pub use geography::{City, Country, District};
pub use image::{
    plan_ingestion, projected_count, BoatImage, ImageChangeSet, ImageUpload, IngestError,
    NewImage,
};
pub use password::{
    Credential, CredentialManager, OsSaltSource, PasswordChange, PasswordChangeError, SaltSource,
};
pub use user::{NewUser, User, UserChanges, UserResponse, UserType};
