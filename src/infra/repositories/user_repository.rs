//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::user_credential;
use crate::domain::{Credential, NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::in_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by phone number
    async fn find_by_phone(&self, phone_number: &str) -> AppResult<Option<User>>;

    /// Insert a user together with its credential, atomically
    async fn create(&self, user: NewUser, credential: Credential) -> AppResult<User>;

    /// Update contact details
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Delete user; credential and boats go with it
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List all users
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map a unique-index violation to a conflict on `entity`.
fn conflict_on_unique(entity: &'static str) -> impl Fn(DbErr) -> AppError {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(entity),
        _ => AppError::from(e),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_phone(&self, phone_number: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::PhoneNumber.eq(phone_number))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser, credential: Credential) -> AppResult<User> {
        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let now = chrono::Utc::now();
                let user_id = Uuid::new_v4();

                let model = ActiveModel {
                    id: Set(user_id),
                    email: Set(new_user.email),
                    name: Set(new_user.name),
                    phone_number: Set(new_user.phone_number),
                    user_type: Set(new_user.user_type.to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(conflict_on_unique("User"))?;

                let (password_hash, password_salt) = credential.into_parts();
                user_credential::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    password_hash: Set(password_hash),
                    password_salt: Set(password_salt),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(AppError::from)?;

                Ok(User::from(model))
            })
        })
        .await
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();

        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(phone_number) = changes.phone_number {
            active.phone_number = Set(Some(phone_number));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(conflict_on_unique("User"))?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
