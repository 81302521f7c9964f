//! Boat listing entity and read models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::image::BoatImage;

/// Boat listing as stored
#[derive(Debug, Clone, PartialEq)]
pub struct Boat {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub fields: BoatFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner-editable listing fields, replaced wholesale on update.
#[derive(Debug, Clone, PartialEq)]
pub struct BoatFields {
    pub name: String,
    pub description: String,
    pub price_per_hour: f64,
    pub capacity: i32,
    pub is_available: bool,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
    pub district_id: Uuid,
}

/// Data for a boat row inserted together with its first images.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBoat {
    pub owner_id: Uuid,
    pub fields: BoatFields,
}

/// Listing search. Absent criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoatFilter {
    /// Boats seating at least this many
    pub min_capacity: Option<i32>,
    /// Boats costing at most this per hour
    pub max_price: Option<f64>,
    /// Case-insensitive substring of the city name
    pub city: Option<String>,
    /// Case-insensitive substring of the district name
    pub district: Option<String>,
}

/// Boat joined with owner, location and images.
#[derive(Debug, Clone, PartialEq)]
pub struct BoatDetails {
    pub boat: Boat,
    pub owner_name: String,
    pub owner_phone_number: Option<String>,
    pub district_name: String,
    pub city_id: Uuid,
    pub city_name: String,
    pub country_id: Uuid,
    pub country_name: String,
    pub images: Vec<BoatImage>,
}

impl BoatDetails {
    pub fn image_ids(&self) -> Vec<Uuid> {
        self.images.iter().map(|image| image.id).collect()
    }
}

/// Image as rendered to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BoatImageResponse {
    pub id: Uuid,
    /// `data:` URI carrying the stored content type
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub data_uri: String,
}

impl From<&BoatImage> for BoatImageResponse {
    fn from(image: &BoatImage) -> Self {
        Self {
            id: image.id,
            data_uri: image.data_uri(),
        }
    }
}

/// Boat response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BoatResponse {
    pub id: Uuid,
    #[schema(example = "Blue Horizon")]
    pub name: String,
    pub description: String,
    #[schema(example = 450.0)]
    pub price_per_hour: f64,
    #[schema(example = 12)]
    pub capacity: i32,
    pub is_available: bool,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub owner_phone_number: Option<String>,
    pub district_id: Uuid,
    pub district_name: String,
    pub city_id: Uuid,
    pub city_name: String,
    pub country_id: Uuid,
    pub country_name: String,
    pub images: Vec<BoatImageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BoatDetails> for BoatResponse {
    fn from(details: BoatDetails) -> Self {
        let BoatDetails {
            boat,
            owner_name,
            owner_phone_number,
            district_name,
            city_id,
            city_name,
            country_id,
            country_name,
            images,
        } = details;
        let fields = boat.fields;

        Self {
            id: boat.id,
            name: fields.name,
            description: fields.description,
            price_per_hour: fields.price_per_hour,
            capacity: fields.capacity,
            is_available: fields.is_available,
            available_from: fields.available_from,
            available_to: fields.available_to,
            owner_id: boat.owner_id,
            owner_name,
            owner_phone_number,
            district_id: fields.district_id,
            district_name,
            city_id,
            city_name,
            country_id,
            country_name,
            images: images.iter().map(BoatImageResponse::from).collect(),
            created_at: boat.created_at,
            updated_at: boat.updated_at,
        }
    }
}
