//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, location_handler, request_handler, staff_handler};
use crate::domain::{
    AccountResponse, AttachmentView, Location, Priority, RequestDetail, RequestStatus, Role,
    ServiceRequest,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the service request API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Service Desk API",
        version = "0.1.0",
        description = "Municipal service-request management: public intake, admin triage, location-scoped staff views",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::change_password,
        // Location endpoints
        location_handler::create_location,
        location_handler::list_locations,
        location_handler::get_location,
        // Request endpoints
        request_handler::create_request,
        request_handler::get_request,
        request_handler::list_requests,
        request_handler::list_requests_by_status,
        request_handler::update_status,
        request_handler::upload_attachments,
        // Staff endpoints
        staff_handler::register_staff,
        staff_handler::list_own_requests,
        staff_handler::get_own_request,
    ),
    components(
        schemas(
            // Domain types
            Role,
            AccountResponse,
            Location,
            Priority,
            RequestStatus,
            ServiceRequest,
            RequestDetail,
            AttachmentView,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::ChangePasswordRequest,
            TokenResponse,
            MessageResponse,
            // Handler payloads
            location_handler::CreateLocationRequest,
            request_handler::CreateRequestBody,
            request_handler::UpdateStatusBody,
            staff_handler::RegisterStaffRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and password management"),
        (name = "Locations", description = "Locations that own service requests"),
        (name = "Requests", description = "Service request intake and triage"),
        (name = "Staff", description = "Location-bound staff operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
