//! Service request handlers.
//!
//! Intake (create + attachments) is public; triage (detail, listings,
//! status moves) is admin-gated. Both live on the same `/requests`
//! subtree, so the routes run behind optional authentication and the
//! handlers enforce the role.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::location_handler::location_routes;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin_caller, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    AttachmentOrigin, AttachmentView, NewServiceRequest, Priority, RequestDetail, RequestStatus,
    ServiceRequest,
};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Request intake payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequestBody {
    /// Owning location
    pub location_id: Uuid,
    /// Short summary of the problem
    #[validate(length(min = 1, message = "Subject is required"))]
    #[schema(example = "Lâmpada queimada no corredor")]
    pub subject: String,
    /// Requester name
    #[validate(length(min = 1, message = "Requester name is required"))]
    pub requester_name: String,
    /// Requester contact email
    #[validate(email(message = "Invalid email format"))]
    pub requester_email: String,
    /// Requester contact phone
    #[validate(length(min = 1, message = "Requester phone is required"))]
    pub requester_phone: String,
    /// Full problem description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// Sub-unit within the location
    #[validate(length(min = 1, message = "Unit name is required"))]
    pub unit_name: String,
    /// Priority: baixa, media or alta
    pub priority: Priority,
    /// Free-form extra context
    pub additional_info: Option<String>,
}

/// Admin listing query: location plus pagination
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    pub location_id: Uuid,
    #[serde(flatten)]
    pub page: PaginationParams,
}

/// Status update payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusBody {
    /// Target status: criado, em_andamento or concluido
    #[schema(example = "em_andamento")]
    pub status: String,
}

/// Create service request routes
pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_request).get(list_requests))
        .route("/:id", get(get_request))
        .route("/status/:status", get(list_requests_by_status))
        .route("/:id/status", put(update_status))
        .route("/:id/attachments", post(upload_attachments))
        .nest("/locations", location_routes())
}

/// Open a new service request (public intake)
#[utoipa::path(
    post,
    path = "/requests",
    tag = "Requests",
    request_body = CreateRequestBody,
    responses(
        (status = 201, description = "Request created", body = ServiceRequest),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Location not found")
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateRequestBody>,
) -> AppResult<(StatusCode, Json<ServiceRequest>)> {
    let request = state
        .request_service
        .create_request(NewServiceRequest {
            location_id: payload.location_id,
            subject: payload.subject,
            requester_name: payload.requester_name,
            requester_email: payload.requester_email,
            requester_phone: payload.requester_phone,
            description: payload.description,
            unit_name: payload.unit_name,
            priority: payload.priority,
            additional_info: payload.additional_info,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// Request detail with attachment URLs (admin only)
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "Request ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request detail", body = RequestDetail),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    current_user: Option<Extension<CurrentUser>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RequestDetail>> {
    require_admin_caller(current_user.as_deref())?;

    let detail = state.request_service.get_request_detail(id).await?;

    Ok(Json(detail))
}

/// List requests for a location (admin only)
#[utoipa::path(
    get,
    path = "/requests",
    tag = "Requests",
    params(
        ("location_id" = Uuid, Query, description = "Location to list"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("limit" = Option<u64>, Query, description = "Page size, capped at 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Requests, newest first", body = [ServiceRequest]),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    current_user: Option<Extension<CurrentUser>>,
    Query(query): Query<ListRequestsQuery>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    require_admin_caller(current_user.as_deref())?;

    let requests = state
        .request_service
        .list_by_location(query.location_id, query.page)
        .await?;

    Ok(Json(requests))
}

/// List requests in a status (admin only)
#[utoipa::path(
    get,
    path = "/requests/status/{status}",
    tag = "Requests",
    params(
        ("status" = String, Path, description = "criado, em_andamento or concluido"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("limit" = Option<u64>, Query, description = "Page size, capped at 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Requests, newest first", body = [ServiceRequest]),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_requests_by_status(
    State(state): State<AppState>,
    current_user: Option<Extension<CurrentUser>>,
    Path(status): Path<String>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    require_admin_caller(current_user.as_deref())?;

    let status = RequestStatus::parse(&status)?;
    let requests = state.request_service.list_by_status(status, page).await?;

    Ok(Json(requests))
}

/// Move a request to a new status (admin only)
#[utoipa::path(
    put,
    path = "/requests/{id}/status",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateStatusBody,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status updated", body = ServiceRequest),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    current_user: Option<Extension<CurrentUser>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusBody>,
) -> AppResult<Json<ServiceRequest>> {
    require_admin_caller(current_user.as_deref())?;

    let status = RequestStatus::parse(&payload.status)?;
    let request = state.request_service.update_status(id, status).await?;

    Ok(Json(request))
}

/// Attach files to a request.
///
/// Deliberately open to unauthenticated callers so requesters can add
/// evidence after intake; an authenticated admin upload is recorded
/// with admin origin.
#[utoipa::path(
    post,
    path = "/requests/{id}/attachments",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 201, description = "Attachments stored", body = [AttachmentView]),
        (status = 400, description = "No files in upload"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn upload_attachments(
    State(state): State<AppState>,
    current_user: Option<Extension<CurrentUser>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Vec<AttachmentView>>)> {
    let origin = match current_user.as_deref() {
        Some(user) if user.is_admin() => AttachmentOrigin::Admin,
        _ => AttachmentOrigin::Client,
    };

    let files = collect_files(multipart).await?;
    let attachments = state.request_service.attach_files(id, files, origin).await?;

    Ok((StatusCode::CREATED, Json(attachments)))
}

/// Buffer every file field of a multipart body.
async fn collect_files(
    mut multipart: Multipart,
) -> AppResult<Vec<crate::infra::UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            // Non-file fields are ignored
            None => continue,
        };
        let content_type = field.content_type().map(|ct| ct.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read '{}': {}", filename, e)))?
            .to_vec();

        files.push(crate::infra::UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }

    Ok(files)
}
