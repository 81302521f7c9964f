//! User account handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, require_self_or_admin, CurrentUser};
use crate::api::AppState;
use crate::config::MIN_PASSWORD_LENGTH;
use crate::domain::{PasswordChange, UserChanges, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::types::{MessageResponse, NoContent};

/// Contact details update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "new-address@example.com")]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Phone number cannot be empty"))]
    #[schema(example = "+905559998877")]
    pub phone_number: Option<String>,
}

/// Password change request
#[derive(Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub new_password: String,
    pub new_password_confirm: String,
}

impl From<ChangePasswordRequest> for PasswordChange {
    fn from(request: ChangePasswordRequest) -> Self {
        Self {
            current_password: request.current_password,
            new_password: request.new_password,
            new_password_confirm: request.new_password_confirm,
        }
    }
}

/// Account routes (JWT required)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Password routes, kept apart so they can carry the stricter rate limit
pub fn password_routes() -> Router<AppState> {
    Router::new().route("/:id/change-password", put(change_password))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_admin(&current_user)?;

    let users = state.services.users().list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_user(current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Get user by ID (self or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 403, description = "Access denied"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require_self_or_admin(&current_user, id)?;

    let user = state.services.users().get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Change email and/or phone number (self or admin)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email or phone number already in use")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_self_or_admin(&current_user, id)?;

    let changes = UserChanges {
        email: payload.email,
        phone_number: payload.phone_number,
    };
    let user = state.services.users().update_user(id, changes).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Change own password
#[utoipa::path(
    put,
    path = "/users/{id}/change-password",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Confirmation mismatch or unchanged password"),
        (status = 401, description = "Current password is incorrect"),
        (status = 403, description = "Only the account holder may change its password")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    if current_user.id != id {
        return Err(AppError::Forbidden);
    }

    state
        .services
        .auth()
        .change_password(id, payload.into())
        .await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// Delete a user with its credential and boats (self or admin)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_self_or_admin(&current_user, id)?;

    state.services.users().delete_user(id).await?;
    Ok(NoContent)
}
