//! Multipart boat form extractor.
//!
//! Collects listing fields, uploaded image files (`images` or `new_images`)
//! and `images_to_delete` ids. Files are passed through untouched; type and
//! count checks belong to the ingestion planner.

use axum::{
    async_trait,
    extract::{multipart::Field, FromRequest, Multipart, Request},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validated_json::format_validation_errors;
use crate::config::{MAX_BOAT_CAPACITY, MAX_BOAT_DESCRIPTION_LENGTH, MAX_BOAT_NAME_LENGTH};
use crate::domain::{BoatFields, ImageUpload};
use crate::errors::{AppError, AppResult};

/// Parsed and validated multipart listing form.
#[derive(Debug)]
pub struct BoatForm {
    /// Listing owner; only meaningful on create
    pub owner_id: Option<Uuid>,
    pub fields: BoatFields,
    pub images: Vec<ImageUpload>,
    pub images_to_delete: Vec<Uuid>,
}

/// Multipart parts accepted by `POST /boats`. Documentation only.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct BoatCreateForm {
    #[schema(example = "Blue Horizon")]
    name: String,
    description: Option<String>,
    /// Must be greater than 0
    #[schema(example = 450.0)]
    price_per_hour: f64,
    #[schema(example = 12)]
    capacity: i32,
    /// Defaults to true
    is_available: Option<bool>,
    available_from: DateTime<Utc>,
    available_to: DateTime<Utc>,
    district_id: Uuid,
    /// Admins may list on behalf of another user; defaults to the caller
    owner_id: Option<Uuid>,
    /// Up to five jpg, jpeg, png or webp files
    #[schema(format = Binary)]
    images: Vec<String>,
}

/// Multipart parts accepted by `PUT /boats/{id}`. Documentation only.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct BoatUpdateForm {
    name: String,
    description: Option<String>,
    price_per_hour: f64,
    capacity: i32,
    is_available: Option<bool>,
    available_from: DateTime<Utc>,
    available_to: DateTime<Utc>,
    district_id: Uuid,
    /// Repeated parts or one comma-separated list
    images_to_delete: Vec<Uuid>,
    /// Added after deletions; the result may hold at most five images
    #[schema(format = Binary)]
    new_images: Vec<String>,
}

/// Text parts as submitted, before required-field checks.
#[derive(Debug, Default, Validate)]
struct RawBoatForm {
    #[validate(length(min = 1, max = MAX_BOAT_NAME_LENGTH, message = "Boat name must be 1-100 characters"))]
    name: String,
    #[validate(length(max = MAX_BOAT_DESCRIPTION_LENGTH, message = "Description is too long"))]
    description: String,
    #[validate(range(exclusive_min = 0.0, message = "Price per hour must be greater than 0"))]
    price_per_hour: Option<f64>,
    #[validate(range(min = 1, max = MAX_BOAT_CAPACITY, message = "Capacity must be between 1 and 1000"))]
    capacity: i32,
    is_available: bool,
    available_from: Option<DateTime<Utc>>,
    available_to: Option<DateTime<Utc>>,
    district_id: Option<Uuid>,
    owner_id: Option<Uuid>,
    images: Vec<ImageUpload>,
    images_to_delete: Vec<Uuid>,
}

impl RawBoatForm {
    fn new() -> Self {
        Self {
            is_available: true,
            ..Self::default()
        }
    }

    async fn accept(&mut self, field: Field<'_>) -> AppResult<()> {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "images" | "new_images" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                self.images.push(ImageUpload::new(filename, content_type, data.to_vec()));
            }
            _ => {
                let value = field.text().await.map_err(multipart_error)?;
                self.set_text(&name, value.trim())?;
            }
        }

        Ok(())
    }

    fn set_text(&mut self, name: &str, value: &str) -> AppResult<()> {
        match name {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            "price_per_hour" => self.price_per_hour = Some(parse_price(name, value)?),
            "capacity" => self.capacity = parse(name, value)?,
            "is_available" => self.is_available = parse_bool(name, value)?,
            "available_from" => self.available_from = Some(parse_datetime(name, value)?),
            "available_to" => self.available_to = Some(parse_datetime(name, value)?),
            "district_id" => self.district_id = Some(parse(name, value)?),
            "owner_id" => self.owner_id = Some(parse(name, value)?),
            "images_to_delete" => {
                // Accept both repeated parts and a comma-separated list
                for id in value.split(',').map(str::trim).filter(|id| !id.is_empty()) {
                    self.images_to_delete.push(parse(name, id)?);
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }

        Ok(())
    }

    fn finish(self) -> AppResult<BoatForm> {
        self.validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        let price_per_hour = self.price_per_hour.ok_or_else(|| required("price_per_hour"))?;
        let available_from = self.available_from.ok_or_else(|| required("available_from"))?;
        let available_to = self.available_to.ok_or_else(|| required("available_to"))?;
        let district_id = self.district_id.ok_or_else(|| required("district_id"))?;

        if available_from > available_to {
            return Err(AppError::validation(
                "available_from must not be later than available_to",
            ));
        }

        Ok(BoatForm {
            owner_id: self.owner_id,
            fields: BoatFields {
                name: self.name,
                description: self.description,
                price_per_hour,
                capacity: self.capacity,
                is_available: self.is_available,
                available_from,
                available_to,
                district_id,
            },
            images: self.images,
            images_to_delete: self.images_to_delete,
        })
    }
}

#[async_trait]
impl<S> FromRequest<S> for BoatForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut form = RawBoatForm::new();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            form.accept(field).await?;
        }

        form.finish()
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(e.body_text())
}

fn required(field: &str) -> AppError {
    AppError::validation(format!("{} is required", field))
}

fn parse<T: FromStr>(field: &str, value: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::validation(format!("{} is invalid", field)))
}

/// Rejects `NaN` and infinities, which range checks let through.
fn parse_price(field: &str, value: &str) -> AppResult<f64> {
    let price: f64 = parse(field, value)?;
    if !price.is_finite() {
        return Err(AppError::validation(format!("{} is invalid", field)));
    }
    Ok(price)
}

fn parse_bool(field: &str, value: &str) -> AppResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(AppError::validation(format!("{} is invalid", field))),
    }
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM[:SS]` taken as UTC.
fn parse_datetime(field: &str, value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::validation(format!("{} is invalid", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RawBoatForm {
        let mut form = RawBoatForm::new();
        for (name, value) in [
            ("name", "Blue Horizon"),
            ("description", "Gulet with six cabins"),
            ("price_per_hour", "450.5"),
            ("capacity", "12"),
            ("available_from", "2025-06-01T09:00:00Z"),
            ("available_to", "2025-09-30T18:00"),
            ("district_id", "6f1c1a3e-6a0f-4a53-9e57-3a8f0f5c0b11"),
        ] {
            form.set_text(name, value).unwrap();
        }
        form
    }

    #[test]
    fn test_complete_form_builds_fields() {
        let form = filled().finish().unwrap();

        assert_eq!(form.fields.name, "Blue Horizon");
        assert_eq!(form.fields.capacity, 12);
        assert!(form.fields.is_available);
        assert!(form.owner_id.is_none());
        assert!(form.fields.available_from < form.fields.available_to);
    }

    #[test]
    fn test_missing_district_is_rejected() {
        let mut form = filled();
        form.district_id = None;

        let result = form.finish();
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("district_id")));
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let mut form = filled();
        form.price_per_hour = None;

        let result = form.finish();
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("price_per_hour")));
    }

    #[test]
    fn test_zero_price_is_rejected() {
        let mut form = filled();
        form.set_text("price_per_hour", "0").unwrap();

        let result = form.finish();
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("greater than 0")));
    }

    #[test]
    fn test_non_finite_price_is_rejected() {
        for value in ["NaN", "inf", "-inf"] {
            let mut form = filled();
            let result = form.set_text("price_per_hour", value);
            assert!(
                matches!(result, Err(AppError::Validation(ref msg)) if msg == "price_per_hour is invalid"),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_inverted_availability_window_is_rejected() {
        let mut form = filled();
        form.set_text("available_from", "2025-10-01T00:00:00Z").unwrap();

        assert!(matches!(form.finish(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_capacity_out_of_range_is_rejected() {
        let mut form = filled();
        form.set_text("capacity", "0").unwrap();

        assert!(matches!(form.finish(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_images_to_delete_accepts_lists_and_repeats() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let mut form = filled();
        form.set_text("images_to_delete", &format!("{}, {}", a, b)).unwrap();
        form.set_text("images_to_delete", &c.to_string()).unwrap();
        form.set_text("images_to_delete", "").unwrap();

        assert_eq!(form.finish().unwrap().images_to_delete, vec![a, b, c]);
    }

    #[test]
    fn test_unparseable_number_is_rejected() {
        let mut form = RawBoatForm::new();
        let result = form.set_text("price_per_hour", "cheap");
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "price_per_hour is invalid"));
    }

    #[test]
    fn test_availability_flag_parsing() {
        let mut form = RawBoatForm::new();
        form.set_text("is_available", "off").unwrap();
        assert!(!form.is_available);
        form.set_text("is_available", "True").unwrap();
        assert!(form.is_available);
    }
}
