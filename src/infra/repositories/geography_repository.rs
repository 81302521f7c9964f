//! Read-only access to countries, cities and districts.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::{city, country, district};
use crate::domain::{City, Country, District};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait GeographyRepository: Send + Sync {
    async fn list_countries(&self) -> AppResult<Vec<Country>>;

    async fn find_country(&self, id: Uuid) -> AppResult<Option<Country>>;

    /// Cities of a country, by name
    async fn list_cities(&self, country_id: Uuid) -> AppResult<Vec<City>>;

    async fn find_city(&self, id: Uuid) -> AppResult<Option<City>>;

    /// Districts of a city, by name
    async fn list_districts(&self, city_id: Uuid) -> AppResult<Vec<District>>;

    async fn find_district(&self, id: Uuid) -> AppResult<Option<District>>;
}

pub struct GeographyStore {
    db: DatabaseConnection,
}

impl GeographyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GeographyRepository for GeographyStore {
    async fn list_countries(&self) -> AppResult<Vec<Country>> {
        let models = country::Entity::find()
            .order_by_asc(country::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Country::from).collect())
    }

    async fn find_country(&self, id: Uuid) -> AppResult<Option<Country>> {
        let result = country::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Country::from))
    }

    async fn list_cities(&self, country_id: Uuid) -> AppResult<Vec<City>> {
        let models = city::Entity::find()
            .filter(city::Column::CountryId.eq(country_id))
            .order_by_asc(city::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(City::from).collect())
    }

    async fn find_city(&self, id: Uuid) -> AppResult<Option<City>> {
        let result = city::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(City::from))
    }

    async fn list_districts(&self, city_id: Uuid) -> AppResult<Vec<District>> {
        let models = district::Entity::find()
            .filter(district::Column::CityId.eq(city_id))
            .order_by_asc(district::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(District::from).collect())
    }

    async fn find_district(&self, id: Uuid) -> AppResult<Option<District>> {
        let result = district::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(District::from))
    }
}
