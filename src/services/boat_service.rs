//! Boat service - listing CRUD with image ingestion.
//!
//! Every create and update runs the uploaded images through
//! `domain::image::plan_ingestion` before anything is written; the
//! repository then commits boat fields and the image change-set together.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::domain::{plan_ingestion, BoatDetails, BoatFields, BoatFilter, ImageUpload, NewBoat};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Boat service trait for dependency injection.
#[async_trait]
pub trait BoatService: Send + Sync {
    /// Get boat with owner, location and images
    async fn get_boat(&self, id: Uuid) -> AppResult<BoatDetails>;

    /// Search listings
    async fn list_boats(&self, filter: BoatFilter) -> AppResult<Vec<BoatDetails>>;

    /// Listings of one owner
    async fn list_user_boats(&self, owner_id: Uuid) -> AppResult<Vec<BoatDetails>>;

    /// Create a listing with up to the allowed number of images
    async fn create_boat(&self, boat: NewBoat, images: Vec<ImageUpload>)
        -> AppResult<BoatDetails>;

    /// Replace listing fields, delete `images_to_delete` and attach `new_images`
    async fn update_boat(
        &self,
        id: Uuid,
        fields: BoatFields,
        images_to_delete: Vec<Uuid>,
        new_images: Vec<ImageUpload>,
    ) -> AppResult<BoatDetails>;

    /// Delete a listing and its images
    async fn delete_boat(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of BoatService using Unit of Work.
pub struct BoatManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BoatManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_district(&self, district_id: Uuid) -> AppResult<()> {
        match self.uow.geography().find_district(district_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::BadRequest(format!(
                "District with ID {} does not exist",
                district_id
            ))),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> BoatService for BoatManager<U> {
    async fn get_boat(&self, id: Uuid) -> AppResult<BoatDetails> {
        self.uow
            .boats()
            .find_by_id(id)
            .await?
            .ok_or_not_found()
    }

    async fn list_boats(&self, filter: BoatFilter) -> AppResult<Vec<BoatDetails>> {
        self.uow.boats().list(filter).await
    }

    async fn list_user_boats(&self, owner_id: Uuid) -> AppResult<Vec<BoatDetails>> {
        self.uow.boats().list_by_owner(owner_id).await
    }

    async fn create_boat(
        &self,
        boat: NewBoat,
        images: Vec<ImageUpload>,
    ) -> AppResult<BoatDetails> {
        let users = self.uow.users();
        let (owner, _) = parallel::join2(
            users.find_by_id(boat.owner_id),
            self.ensure_district(boat.fields.district_id),
        )
        .await?;

        if owner.is_none() {
            return Err(AppError::BadRequest(format!(
                "User with ID {} does not exist",
                boat.owner_id
            )));
        }

        let plan = plan_ingestion(&[], &[], images)?;
        let added = plan.add.len();

        let created = self.uow.boats().create(boat, plan.add).await?;

        tracing::info!(boat_id = %created.boat.id, images = added, "Boat created");
        Ok(created)
    }

    async fn update_boat(
        &self,
        id: Uuid,
        fields: BoatFields,
        images_to_delete: Vec<Uuid>,
        new_images: Vec<ImageUpload>,
    ) -> AppResult<BoatDetails> {
        let (current, _) =
            parallel::join2(self.get_boat(id), self.ensure_district(fields.district_id)).await?;

        let existing = current.image_ids();
        let plan = match plan_ingestion(&existing, &images_to_delete, new_images) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::info!(boat_id = %id, error = %e, "Image change rejected");
                return Err(e.into());
            }
        };

        tracing::debug!(
            boat_id = %id,
            existing = existing.len(),
            removed = plan.remove.len(),
            added = plan.add.len(),
            "Applying image change-set"
        );

        self.uow.boats().update(id, fields, plan).await
    }

    async fn delete_boat(&self, id: Uuid) -> AppResult<()> {
        self.uow.boats().delete(id).await?;
        tracing::info!(boat_id = %id, "Boat deleted");
        Ok(())
    }
}
