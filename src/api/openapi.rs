//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::extractors::{BoatCreateForm, BoatUpdateForm};
use crate::api::handlers::{auth_handler, boat_handler, geography_handler, user_handler};
use crate::domain::{BoatImageResponse, BoatResponse, City, Country, District, UserResponse, UserType};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Boat Rental API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Boat Rental API",
        version = "0.1.0",
        description = "Boat listings with owner accounts, image uploads and location lookups",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // User endpoints
        user_handler::list_users,
        user_handler::get_current_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::change_password,
        user_handler::delete_user,
        // Boat endpoints
        boat_handler::list_boats,
        boat_handler::get_boat,
        boat_handler::list_user_boats,
        boat_handler::create_boat,
        boat_handler::update_boat,
        boat_handler::delete_boat,
        // Geography endpoints
        geography_handler::list_countries,
        geography_handler::list_cities,
        geography_handler::list_districts,
    ),
    components(
        schemas(
            UserType,
            UserResponse,
            BoatResponse,
            BoatImageResponse,
            BoatCreateForm,
            BoatUpdateForm,
            Country,
            City,
            District,
            MessageResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            user_handler::UpdateUserRequest,
            user_handler::ChangePasswordRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "Account management and password changes"),
        (name = "Boats", description = "Boat listings and their images"),
        (name = "Geography", description = "Countries, cities and districts")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
