//! Read-only location taxonomy: country > city > district.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Country {
    pub id: Uuid,
    #[schema(example = "Türkiye")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct City {
    pub id: Uuid,
    pub country_id: Uuid,
    #[schema(example = "Muğla")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct District {
    pub id: Uuid,
    pub city_id: Uuid,
    #[schema(example = "Bodrum")]
    pub name: String,
}
