//! Application configuration module
//!
//! Environment-driven settings plus the constants that bound credentials,
//! image uploads and rate limits.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
