//! Boat listing handlers.
//!
//! Create and update take `multipart/form-data`; see [`BoatForm`] for the
//! accepted parts.

use axum::{
    extract::{FromRequest, Path, Query, Request, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::{BoatCreateForm, BoatForm, BoatUpdateForm};
use crate::api::middleware::{require_self_or_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{BoatFilter, BoatResponse, NewBoat};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Listing search parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BoatQuery {
    /// Minimum number of guests
    pub capacity: Option<i32>,
    /// Maximum hourly price
    pub price: Option<f64>,
    /// Case-insensitive part of the city name
    pub city: Option<String>,
    /// Case-insensitive part of the district name
    pub district: Option<String>,
}

impl From<BoatQuery> for BoatFilter {
    fn from(query: BoatQuery) -> Self {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            min_capacity: query.capacity,
            max_price: query.price,
            city: non_blank(query.city),
            district: non_blank(query.district),
        }
    }
}

/// Public listing routes
pub fn boat_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_boats))
        .route("/:id", get(get_boat))
        .route("/user/:user_id", get(list_user_boats))
}

/// Listing changes (JWT required)
pub fn boat_owner_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_boat))
        .route("/:id", put(update_boat).delete(delete_boat))
}

/// Search boats
#[utoipa::path(
    get,
    path = "/boats",
    tag = "Boats",
    params(BoatQuery),
    responses(
        (status = 200, description = "Matching boats", body = Vec<BoatResponse>)
    )
)]
pub async fn list_boats(
    State(state): State<AppState>,
    Query(query): Query<BoatQuery>,
) -> AppResult<Json<Vec<BoatResponse>>> {
    let boats = state.services.boats().list_boats(query.into()).await?;
    Ok(Json(boats.into_iter().map(BoatResponse::from).collect()))
}

/// Get boat by ID
#[utoipa::path(
    get,
    path = "/boats/{id}",
    tag = "Boats",
    params(("id" = Uuid, Path, description = "Boat ID")),
    responses(
        (status = 200, description = "Boat found", body = BoatResponse),
        (status = 404, description = "Boat not found")
    )
)]
pub async fn get_boat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BoatResponse>> {
    let boat = state.services.boats().get_boat(id).await?;
    Ok(Json(BoatResponse::from(boat)))
}

/// Boats of one owner
#[utoipa::path(
    get,
    path = "/boats/user/{user_id}",
    tag = "Boats",
    params(("user_id" = Uuid, Path, description = "Owner ID")),
    responses(
        (status = 200, description = "Owner's boats", body = Vec<BoatResponse>)
    )
)]
pub async fn list_user_boats(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<BoatResponse>>> {
    let boats = state.services.boats().list_user_boats(user_id).await?;
    Ok(Json(boats.into_iter().map(BoatResponse::from).collect()))
}

/// Create a boat with up to five images
#[utoipa::path(
    post,
    path = "/boats",
    tag = "Boats",
    security(("bearer_auth" = [])),
    request_body(content = BoatCreateForm, content_type = "multipart/form-data", description = "Listing fields, optional owner_id and `images` files"),
    responses(
        (status = 201, description = "Boat created", body = BoatResponse),
        (status = 400, description = "Invalid fields, unknown owner or district, too many images or unsupported file type"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is neither the owner nor an admin")
    )
)]
pub async fn create_boat(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    form: BoatForm,
) -> AppResult<Created<BoatResponse>> {
    let owner_id = form.owner_id.unwrap_or(current_user.id);
    require_self_or_admin(&current_user, owner_id)?;

    let boat = state
        .services
        .boats()
        .create_boat(
            NewBoat {
                owner_id,
                fields: form.fields,
            },
            form.images,
        )
        .await?;

    Ok(Created(BoatResponse::from(boat)))
}

/// Replace boat fields and apply an image change-set
#[utoipa::path(
    put,
    path = "/boats/{id}",
    tag = "Boats",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Boat ID")),
    request_body(content = BoatUpdateForm, content_type = "multipart/form-data", description = "Listing fields, `images_to_delete` ids and `new_images` files"),
    responses(
        (status = 200, description = "Boat updated", body = BoatResponse),
        (status = 400, description = "Invalid fields, too many images or unsupported file type"),
        (status = 403, description = "Caller is neither the owner nor an admin"),
        (status = 404, description = "Boat not found")
    )
)]
pub async fn update_boat(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    request: Request,
) -> AppResult<Json<BoatResponse>> {
    let boats = state.services.boats();
    let current = boats.get_boat(id).await?;
    require_self_or_admin(&current_user, current.boat.owner_id)?;

    // Body is read only once ownership is settled
    let form = BoatForm::from_request(request, &state).await?;

    let boat = boats
        .update_boat(id, form.fields, form.images_to_delete, form.images)
        .await?;

    Ok(Json(BoatResponse::from(boat)))
}

/// Delete a boat and its images
#[utoipa::path(
    delete,
    path = "/boats/{id}",
    tag = "Boats",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Boat ID")),
    responses(
        (status = 204, description = "Boat deleted"),
        (status = 403, description = "Caller is neither the owner nor an admin"),
        (status = 404, description = "Boat not found")
    )
)]
pub async fn delete_boat(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    let boats = state.services.boats();
    let current = boats.get_boat(id).await?;
    require_self_or_admin(&current_user, current.boat.owner_id)?;

    boats.delete_boat(id).await?;
    Ok(NoContent)
}
