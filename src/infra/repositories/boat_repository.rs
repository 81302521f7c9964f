//! Boat repository implementation.
//!
//! Boat rows and their images are written together: `create` and `update`
//! each run in one transaction, so an image change-set is either applied in
//! full or not at all.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use uuid::Uuid;

use super::entities::boat::{self, ActiveModel, Entity as BoatEntity};
use super::entities::{boat_image, city, country, district, user};
use crate::config::MAX_IMAGES_PER_BOAT;
use crate::domain::{
    Boat, BoatDetails, BoatFields, BoatFilter, BoatImage, ImageChangeSet, IngestError, NewBoat,
    NewImage,
};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::in_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Boat repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BoatRepository: Send + Sync {
    /// Find boat with owner, location and images
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BoatDetails>>;

    /// Search listings, newest first
    async fn list(&self, filter: BoatFilter) -> AppResult<Vec<BoatDetails>>;

    /// Listings of one owner, newest first
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<BoatDetails>>;

    /// Insert a boat and its first images in one transaction
    async fn create(&self, boat: NewBoat, images: Vec<NewImage>) -> AppResult<BoatDetails>;

    /// Replace boat fields and apply an image change-set in one transaction.
    ///
    /// # Errors
    /// `CapacityExceeded` (rolled back) if the boat would end up with more
    /// than the allowed number of images.
    async fn update(
        &self,
        id: Uuid,
        fields: BoatFields,
        images: ImageChangeSet,
    ) -> AppResult<BoatDetails>;

    /// Delete boat; images go with it
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of BoatRepository
pub struct BoatStore {
    db: DatabaseConnection,
}

impl BoatStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BoatRepository for BoatStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BoatDetails>> {
        let models: Vec<boat::Model> = BoatEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .collect();

        Ok(load_details(&self.db, models).await?.pop())
    }

    async fn list(&self, filter: BoatFilter) -> AppResult<Vec<BoatDetails>> {
        let models = filtered(filter)
            .order_by_desc(boat::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        load_details(&self.db, models).await
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<BoatDetails>> {
        let models = BoatEntity::find()
            .filter(boat::Column::OwnerId.eq(owner_id))
            .order_by_desc(boat::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        load_details(&self.db, models).await
    }

    async fn create(&self, new_boat: NewBoat, images: Vec<NewImage>) -> AppResult<BoatDetails> {
        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let now = chrono::Utc::now();
                let fields = new_boat.fields;

                let model = ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(fields.name),
                    description: Set(fields.description),
                    price_per_hour: Set(fields.price_per_hour),
                    capacity: Set(fields.capacity),
                    is_available: Set(fields.is_available),
                    available_from: Set(fields.available_from),
                    available_to: Set(fields.available_to),
                    owner_id: Set(new_boat.owner_id),
                    district_id: Set(fields.district_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(AppError::from)?;

                insert_images(txn, model.id, images).await?;

                load_details(txn, vec![model])
                    .await?
                    .pop()
                    .ok_or_else(|| AppError::consistency("Created boat vanished inside its transaction"))
            })
        })
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        fields: BoatFields,
        images: ImageChangeSet,
    ) -> AppResult<BoatDetails> {
        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                // Row lock serializes concurrent image edits of the same boat
                let current = BoatEntity::find_by_id(id)
                    .lock_exclusive()
                    .one(txn)
                    .await?
                    .ok_or(AppError::NotFound)?;

                let mut active: ActiveModel = current.into();
                active.name = Set(fields.name);
                active.description = Set(fields.description);
                active.price_per_hour = Set(fields.price_per_hour);
                active.capacity = Set(fields.capacity);
                active.is_available = Set(fields.is_available);
                active.available_from = Set(fields.available_from);
                active.available_to = Set(fields.available_to);
                active.district_id = Set(fields.district_id);
                active.updated_at = Set(chrono::Utc::now());
                let model = active.update(txn).await.map_err(AppError::from)?;

                if !images.remove.is_empty() {
                    boat_image::Entity::delete_many()
                        .filter(boat_image::Column::BoatId.eq(id))
                        .filter(boat_image::Column::Id.is_in(images.remove))
                        .exec(txn)
                        .await
                        .map_err(AppError::from)?;
                }

                insert_images(txn, id, images.add).await?;

                let total = boat_image::Entity::find()
                    .filter(boat_image::Column::BoatId.eq(id))
                    .count(txn)
                    .await
                    .map_err(AppError::from)? as usize;

                if total > MAX_IMAGES_PER_BOAT {
                    tracing::warn!(boat_id = %id, total, "Concurrent image edit exceeded limit, rolling back");
                    return Err(IngestError::CapacityExceeded {
                        projected: total,
                        max: MAX_IMAGES_PER_BOAT,
                    }
                    .into());
                }

                load_details(txn, vec![model])
                    .await?
                    .pop()
                    .ok_or_else(|| AppError::consistency("Updated boat vanished inside its transaction"))
            })
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = BoatEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Boat query with search criteria applied.
fn filtered(filter: BoatFilter) -> Select<BoatEntity> {
    let mut query = BoatEntity::find();

    if let Some(min_capacity) = filter.min_capacity {
        query = query.filter(boat::Column::Capacity.gte(min_capacity));
    }
    if let Some(max_price) = filter.max_price {
        query = query.filter(boat::Column::PricePerHour.lte(max_price));
    }

    if filter.city.is_some() || filter.district.is_some() {
        query = query.join(JoinType::InnerJoin, boat::Relation::District.def());

        if let Some(term) = filter.district {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((district::Entity, district::Column::Name))))
                    .like(contains_pattern(&term)),
            );
        }
        if let Some(term) = filter.city {
            query = query
                .join(JoinType::InnerJoin, district::Relation::City.def())
                .filter(
                    Expr::expr(Func::lower(Expr::col((city::Entity, city::Column::Name))))
                        .like(contains_pattern(&term)),
                );
        }
    }

    query
}

/// Case-insensitive substring pattern with LIKE wildcards escaped.
fn contains_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');

    LikeExpr::new(escaped).escape('\\')
}

async fn insert_images<C: ConnectionTrait>(
    db: &C,
    boat_id: Uuid,
    images: Vec<NewImage>,
) -> AppResult<()> {
    if images.is_empty() {
        return Ok(());
    }

    let now = chrono::Utc::now();
    let rows = images.into_iter().map(|image| boat_image::ActiveModel {
        id: Set(Uuid::new_v4()),
        boat_id: Set(boat_id),
        content_type: Set(image.content_type),
        data: Set(image.data),
        created_at: Set(now),
    });

    boat_image::Entity::insert_many(rows)
        .exec(db)
        .await
        .map_err(AppError::from)?;

    Ok(())
}

/// Join boats with owner, district, city, country and images.
///
/// A boat whose owner or location row is missing is a consistency error;
/// the foreign keys make that impossible in a healthy database.
async fn load_details<C: ConnectionTrait>(
    db: &C,
    boats: Vec<boat::Model>,
) -> AppResult<Vec<BoatDetails>> {
    if boats.is_empty() {
        return Ok(Vec::new());
    }

    let owners = boats.load_one(user::Entity, db).await?;
    let images = boats
        .load_many(
            boat_image::Entity::find().order_by_asc(boat_image::Column::CreatedAt),
            db,
        )
        .await?;
    let districts = required(boats.load_one(district::Entity, db).await?, "district")?;
    let cities = required(districts.load_one(city::Entity, db).await?, "city")?;
    let countries = required(cities.load_one(country::Entity, db).await?, "country")?;
    let owners = required(owners, "owner")?;

    let rows = boats
        .into_iter()
        .zip(owners)
        .zip(districts)
        .zip(cities)
        .zip(countries)
        .zip(images);

    Ok(rows
        .map(|(((((boat, owner), district), city), country), images)| BoatDetails {
            boat: Boat::from(boat),
            owner_name: owner.name,
            owner_phone_number: owner.phone_number,
            district_name: district.name,
            city_id: city.id,
            city_name: city.name,
            country_id: country.id,
            country_name: country.name,
            images: images.into_iter().map(BoatImage::from).collect(),
        })
        .collect())
}

fn required<M>(rows: Vec<Option<M>>, what: &str) -> AppResult<Vec<M>> {
    rows.into_iter()
        .map(|row| row.ok_or_else(|| AppError::consistency(format!("Boat references a missing {}", what))))
        .collect()
}
