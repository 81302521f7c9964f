//! Credential repository: the hash/salt pair of each user.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use super::entities::user_credential::{self, Entity as CredentialEntity};
use crate::domain::Credential;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Stored credential of a user
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Credential>>;

    /// Overwrite hash and salt together.
    ///
    /// # Errors
    /// Consistency error if the user has no credential row.
    async fn replace(&self, user_id: Uuid, credential: Credential) -> AppResult<()>;
}

pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialRepository for CredentialStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Credential>> {
        let result = CredentialEntity::find()
            .filter(user_credential::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Credential::from))
    }

    async fn replace(&self, user_id: Uuid, credential: Credential) -> AppResult<()> {
        let (password_hash, password_salt) = credential.into_parts();

        // Single UPDATE, so readers never see a new hash with a stale salt
        let result = CredentialEntity::update_many()
            .col_expr(user_credential::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(user_credential::Column::PasswordSalt, Expr::value(password_salt))
            .col_expr(user_credential::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(user_credential::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::consistency(format!(
                "No credential row for user {}",
                user_id
            )));
        }

        Ok(())
    }
}
