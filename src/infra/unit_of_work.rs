//! Unit of Work pattern implementation.
//!
//! `UnitOfWork` hands out every repository behind one handle, and
//! [`in_transaction`] is the commit/rollback wrapper the stores use for
//! their multi-row change-sets (user + credential, boat + images).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use super::repositories::{
    BoatRepository, BoatStore, CredentialRepository, CredentialStore, GeographyRepository,
    GeographyStore, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Boxed future borrowing the open transaction.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories. Repository methods
/// that write more than one row are atomic on their own.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get credential repository
    fn credentials(&self) -> Arc<dyn CredentialRepository>;

    /// Get boat repository
    fn boats(&self) -> Arc<dyn BoatRepository>;

    /// Get country/city/district repository
    fn geography(&self) -> Arc<dyn GeographyRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    credential_repo: Arc<CredentialStore>,
    boat_repo: Arc<BoatStore>,
    geography_repo: Arc<GeographyStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            credential_repo: Arc::new(CredentialStore::new(db.clone())),
            boat_repo: Arc::new(BoatStore::new(db.clone())),
            geography_repo: Arc::new(GeographyStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn credentials(&self) -> Arc<dyn CredentialRepository> {
        self.credential_repo.clone()
    }

    fn boats(&self) -> Arc<dyn BoatRepository> {
        self.boat_repo.clone()
    }

    fn geography(&self) -> Arc<dyn GeographyRepository> {
        self.geography_repo.clone()
    }
}

/// Execute a closure within a ReadCommitted transaction.
///
/// The transaction is committed on success or rolled back on error.
pub(crate) async fn in_transaction<F, T>(db: &DatabaseConnection, f: F) -> AppResult<T>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T> + Send,
    T: Send,
{
    let txn = db
        .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
        .await
        .map_err(AppError::from)?;

    match f(&txn).await {
        Ok(result) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
