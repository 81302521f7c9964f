//! Authentication service - registration, login and password changes.
//!
//! Hashing and the password-change rules live in `domain::password`; this
//! service adds the account-level checks around them and persists results
//! through the Unit of Work.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{
    Credential, CredentialManager, NewUser, PasswordChange, User, UserResponse, UserType,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub user_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    /// The authenticated user
    pub user: UserResponse,
}

/// Sign-up data after request validation.
#[derive(Clone)]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub user_type: UserType,
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("phone_number", &self.phone_number)
            .field("user_type", &self.user_type)
            .finish_non_exhaustive()
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and its credential
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Replace the user's credential after checking the current password
    async fn change_password(&self, user_id: Uuid, request: PasswordChange) -> AppResult<()>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        user_type: user.user_type.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        user: UserResponse::from(user.clone()),
    })
}

/// Verify JWT token and extract claims
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    credentials: CredentialManager,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, credentials: CredentialManager, config: Config) -> Self {
        Self {
            uow,
            credentials,
            config,
        }
    }

    async fn stored_credential(&self, user_id: Uuid) -> AppResult<Credential> {
        self.uow
            .credentials()
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::consistency(format!("User {} has no credential", user_id)))
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        // Field formats are validated by the handler's ValidatedJson extractor
        if registration.password != registration.confirm_password {
            return Err(AppError::validation(
                "Password and confirmation do not match",
            ));
        }

        // Admin accounts are never self-service
        if registration.user_type.is_admin() {
            return Err(AppError::Forbidden);
        }

        if self
            .uow
            .users()
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Email"));
        }

        if let Some(phone_number) = registration.phone_number.as_deref() {
            if self.uow.users().find_by_phone(phone_number).await?.is_some() {
                return Err(AppError::conflict("Phone number"));
            }
        }

        let credential = self.credentials.create(&registration.password)?;
        let user = self
            .uow
            .users()
            .create(
                NewUser {
                    email: registration.email,
                    name: registration.name,
                    phone_number: registration.phone_number,
                    user_type: registration.user_type,
                },
                credential,
            )
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let Some(user) = self.uow.users().find_by_email(&email).await? else {
            // Same HMAC work as a real check so unknown emails are not faster
            if let Err(e) = Credential::placeholder().verify(&password) {
                tracing::warn!(error = %e, "Placeholder credential check failed");
            }
            return Err(AppError::InvalidCredentials);
        };

        let stored = self.stored_credential(user.id).await?;
        if !stored.verify(&password)? {
            tracing::debug!(user_id = %user.id, "Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        generate_token(&user, &self.config)
    }

    async fn change_password(&self, user_id: Uuid, request: PasswordChange) -> AppResult<()> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found()?;

        let stored = self.stored_credential(user_id).await?;

        let replacement = match self.credentials.change_password(&stored, &request) {
            Ok(credential) => credential,
            Err(e) => {
                tracing::info!(user_id = %user_id, reason = e.code(), "Password change rejected");
                return Err(e);
            }
        };

        self.uow.credentials().replace(user_id, replacement).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
