//! User service - account lookups and contact-detail changes.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{User, UserChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Change email and/or phone number, keeping both unique
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Delete user with credential and boats
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let current = self.get_user(id).await?;

        if let Some(email) = changes.email.as_deref() {
            if email != current.email {
                if let Some(other) = self.uow.users().find_by_email(email).await? {
                    if other.id != id {
                        return Err(AppError::conflict("Email"));
                    }
                }
            }
        }

        if let Some(phone_number) = changes.phone_number.as_deref() {
            if current.phone_number.as_deref() != Some(phone_number) {
                if let Some(other) = self.uow.users().find_by_phone(phone_number).await? {
                    if other.id != id {
                        return Err(AppError::conflict("Phone number"));
                    }
                }
            }
        }

        self.uow.users().update(id, changes).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.uow.users().delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
