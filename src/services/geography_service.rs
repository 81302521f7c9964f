//! Geography service - read-only location lookups.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{City, Country, District};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait GeographyService: Send + Sync {
    async fn list_countries(&self) -> AppResult<Vec<Country>>;

    /// Cities of an existing country
    async fn list_cities(&self, country_id: Uuid) -> AppResult<Vec<City>>;

    /// Districts of an existing city
    async fn list_districts(&self, city_id: Uuid) -> AppResult<Vec<District>>;
}

pub struct GeographyLookup<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> GeographyLookup<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> GeographyService for GeographyLookup<U> {
    async fn list_countries(&self) -> AppResult<Vec<Country>> {
        self.uow.geography().list_countries().await
    }

    async fn list_cities(&self, country_id: Uuid) -> AppResult<Vec<City>> {
        let geography = self.uow.geography();
        geography
            .find_country(country_id)
            .await?
            .ok_or_not_found()?;

        geography.list_cities(country_id).await
    }

    async fn list_districts(&self, city_id: Uuid) -> AppResult<Vec<District>> {
        let geography = self.uow.geography();
        geography.find_city(city_id).await?.ok_or_not_found()?;

        geography.list_districts(city_id).await
    }
}
