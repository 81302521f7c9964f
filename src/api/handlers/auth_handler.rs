//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH};
use crate::domain::{UserResponse, UserType};
use crate::errors::AppResult;
use crate::services::{Registration, TokenResponse};
use crate::types::Created;

/// User registration request
#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "captain@example.com")]
    pub email: String,
    /// Contact phone number
    #[validate(length(min = 1, message = "Phone number cannot be empty"))]
    #[schema(example = "+905551112233")]
    pub phone_number: Option<String>,
    /// User display name
    #[validate(length(min = MIN_NAME_LENGTH, message = "Name is required"))]
    #[schema(example = "Deniz Kaptan")]
    pub name: String,
    /// Account type; only `boat_owner` can self-register
    #[schema(example = "boat_owner")]
    pub user_type: Option<UserType>,
    /// User password (minimum 8 characters)
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Must equal `password`
    #[schema(example = "SecurePass123!")]
    pub confirm_password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: request.email,
            name: request.name,
            phone_number: request.phone_number,
            user_type: request.user_type.unwrap_or_default(),
            password: request.password,
            confirm_password: request.confirm_password,
        }
    }
}

/// User login request
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "captain@example.com")]
    pub email: String,
    /// User password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin accounts cannot self-register"),
        (status = 409, description = "Email or phone number already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state.services.auth().register(payload.into()).await?;

    Ok(Created(UserResponse::from(user)))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services
        .auth()
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}
