//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, USER_TYPE_ADMIN};
use crate::errors::AppError;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub user_type: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.user_type == USER_TYPE_ADMIN
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.services.auth().verify_token(token)?;

    let current_user = CurrentUser {
        id: claims.sub,
        email: claims.email,
        user_type: claims.user_type,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require admin user type, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Allow the account holder itself or an admin.
pub fn require_self_or_admin(user: &CurrentUser, owner_id: Uuid) -> Result<(), AppError> {
    if user.id == owner_id || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(user_type: &str) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            user_type: user_type.to_string(),
        }
    }

    #[test]
    fn test_owner_passes_ownership_check() {
        let owner = user("boat_owner");
        assert!(require_self_or_admin(&owner, owner.id).is_ok());
    }

    #[test]
    fn test_stranger_is_forbidden() {
        let stranger = user("boat_owner");
        let result = require_self_or_admin(&stranger, Uuid::new_v4());
        assert!(matches!(result, Err(AppError::Forbidden)));
        assert!(matches!(require_admin(&stranger), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_admin_overrides_ownership() {
        let admin = user("admin");
        assert!(require_self_or_admin(&admin, Uuid::new_v4()).is_ok());
        assert!(require_admin(&admin).is_ok());
    }
}
