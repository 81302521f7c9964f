//! Location lookup handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{City, Country, District};
use crate::errors::AppResult;

pub fn geography_routes() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/countries/:id/cities", get(list_cities))
        .route("/cities/:id/districts", get(list_districts))
}

/// List countries
#[utoipa::path(
    get,
    path = "/countries",
    tag = "Geography",
    responses((status = 200, description = "All countries", body = Vec<Country>))
)]
pub async fn list_countries(State(state): State<AppState>) -> AppResult<Json<Vec<Country>>> {
    Ok(Json(state.services.geography().list_countries().await?))
}

/// List cities of a country
#[utoipa::path(
    get,
    path = "/countries/{id}/cities",
    tag = "Geography",
    params(("id" = Uuid, Path, description = "Country ID")),
    responses(
        (status = 200, description = "Cities of the country", body = Vec<City>),
        (status = 404, description = "Country not found")
    )
)]
pub async fn list_cities(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<City>>> {
    Ok(Json(state.services.geography().list_cities(id).await?))
}

/// List districts of a city
#[utoipa::path(
    get,
    path = "/cities/{id}/districts",
    tag = "Geography",
    params(("id" = Uuid, Path, description = "City ID")),
    responses(
        (status = 200, description = "Districts of the city", body = Vec<District>),
        (status = 404, description = "City not found")
    )
)]
pub async fn list_districts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<District>>> {
    Ok(Json(state.services.geography().list_districts(id).await?))
}
