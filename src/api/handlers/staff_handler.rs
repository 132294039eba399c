//! Staff handlers.
//!
//! Staff accounts are created by admins and bound to one location; their
//! request views never leave that location.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, require_staff, CurrentUser};
use crate::api::AppState;
use crate::domain::{AccountResponse, RequestDetail, ServiceRequest};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Staff registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterStaffRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Password (minimum 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(min_length = 6)]
    pub password: String,
    /// Location the account is bound to
    pub location_id: Uuid,
}

/// Create staff routes (all behind required authentication)
pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register_staff))
        .route("/requests", get(list_own_requests))
        .route("/requests/:id", get(get_own_request))
}

/// Register a staff account (admin only)
#[utoipa::path(
    post,
    path = "/staff",
    tag = "Staff",
    request_body = RegisterStaffRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Staff account created", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Location not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_staff(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<RegisterStaffRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    require_admin(&current_user)?;

    let staff = state
        .auth_service
        .register_staff(
            payload.name,
            payload.email,
            payload.password,
            payload.location_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(staff))))
}

/// List requests at the caller's own location
#[utoipa::path(
    get,
    path = "/staff/requests",
    tag = "Staff",
    params(
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("limit" = Option<u64>, Query, description = "Page size, capped at 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Requests at the caller's location", body = [ServiceRequest]),
        (status = 403, description = "Staff role required")
    )
)]
pub async fn list_own_requests(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    let location_id = require_staff(&current_user)?;

    let requests = state
        .request_service
        .list_by_location(location_id, page)
        .await?;

    Ok(Json(requests))
}

/// Request detail, only when it belongs to the caller's location
#[utoipa::path(
    get,
    path = "/staff/requests/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "Request ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request detail", body = RequestDetail),
        (status = 403, description = "Request belongs to another location"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_own_request(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RequestDetail>> {
    let location_id = require_staff(&current_user)?;

    let detail = state.request_service.get_request_detail(id).await?;
    ensure_own_location(&detail, location_id)?;

    Ok(Json(detail))
}

/// A request is visible to staff only when it belongs to their location.
fn ensure_own_location(detail: &RequestDetail, location_id: Uuid) -> AppResult<()> {
    if detail.request.location_id == location_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, RequestStatus};
    use chrono::Utc;

    fn detail_at(location_id: Uuid) -> RequestDetail {
        RequestDetail {
            request: ServiceRequest {
                id: Uuid::new_v4(),
                order_number: 7,
                location_id,
                subject: "Subject".to_string(),
                requester_name: "Name".to_string(),
                requester_email: "name@example.com".to_string(),
                requester_phone: "11999990000".to_string(),
                description: "Description".to_string(),
                unit_name: "Unit".to_string(),
                priority: Priority::Low,
                status: RequestStatus::Created,
                additional_info: None,
                created_at: Utc::now(),
            },
            attachments: vec![],
        }
    }

    #[test]
    fn test_staff_sees_request_at_own_location() {
        let location_id = Uuid::new_v4();

        assert!(ensure_own_location(&detail_at(location_id), location_id).is_ok());
    }

    #[test]
    fn test_staff_denied_request_at_other_location() {
        let result = ensure_own_location(&detail_at(Uuid::new_v4()), Uuid::new_v4());

        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
