//! Location handlers.
//!
//! Nested under `/requests/locations`. Creation is admin-only; lookups
//! are public so the intake form can resolve its location.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin_caller, CurrentUser};
use crate::api::AppState;
use crate::domain::{Location, NewLocation};
use crate::errors::AppResult;

/// Location creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLocationRequest {
    /// Location name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Prefeitura Central")]
    pub name: String,
    /// City
    #[validate(length(min = 1, message = "City is required"))]
    #[schema(example = "São Paulo")]
    pub city: String,
    /// State
    #[validate(length(min = 1, message = "State is required"))]
    #[schema(example = "SP")]
    pub state: String,
}

/// City/state lookup query
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub city: String,
    pub state: String,
}

/// Create location routes
pub fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/:id", get(get_location))
}

/// Register a new location (admin only)
#[utoipa::path(
    post,
    path = "/requests/locations",
    tag = "Locations",
    request_body = CreateLocationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Location created", body = Location),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_location(
    State(state): State<AppState>,
    current_user: Option<Extension<CurrentUser>>,
    ValidatedJson(payload): ValidatedJson<CreateLocationRequest>,
) -> AppResult<(StatusCode, Json<Location>)> {
    require_admin_caller(current_user.as_deref())?;

    let location = state
        .request_service
        .create_location(NewLocation::new(payload.name, payload.city, payload.state))
        .await?;

    Ok((StatusCode::CREATED, Json(location)))
}

/// List locations for a city/state pair
#[utoipa::path(
    get,
    path = "/requests/locations",
    tag = "Locations",
    params(
        ("city" = String, Query, description = "City name, case-insensitive"),
        ("state" = String, Query, description = "State, case-insensitive")
    ),
    responses(
        (status = 200, description = "Locations in the city/state", body = [Location])
    )
)]
pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<Location>>> {
    let locations = state
        .request_service
        .list_locations(&query.city, &query.state)
        .await?;

    Ok(Json(locations))
}

/// Get a single location
#[utoipa::path(
    get,
    path = "/requests/locations/{id}",
    tag = "Locations",
    params(("id" = Uuid, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location found", body = Location),
        (status = 404, description = "Location not found")
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Location>> {
    let location = state.request_service.get_location(id).await?;

    Ok(Json(location))
}
