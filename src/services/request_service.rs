//! Request service - Handles the service request lifecycle.
//!
//! Covers locations, request intake, triage listings, status moves and
//! attachment uploads. Creating a request additionally fans out an admin
//! notification once the row is committed.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    AttachmentOrigin, AttachmentView, Location, NewLocation, NewServiceRequest, RequestDetail,
    RequestStatus, ServiceRequest,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{UnitOfWork, UploadedFile};
use crate::jobs::{dispatch_request_created, Notifier};
use crate::types::PaginationParams;

/// Request service trait for dependency injection.
#[async_trait]
pub trait RequestService: Send + Sync {
    /// Register a new location
    async fn create_location(&self, location: NewLocation) -> AppResult<Location>;

    /// List locations registered for a city/state pair
    async fn list_locations(&self, city: &str, state: &str) -> AppResult<Vec<Location>>;

    /// Get a single location
    async fn get_location(&self, id: Uuid) -> AppResult<Location>;

    /// Open a new service request.
    ///
    /// The location is resolved (`NotFound` when absent) and the row
    /// inserted inside one transaction; admins are notified after the
    /// commit, detached.
    async fn create_request(&self, request: NewServiceRequest) -> AppResult<ServiceRequest>;

    /// Request detail including attachments with signed URLs
    async fn get_request_detail(&self, id: Uuid) -> AppResult<RequestDetail>;

    /// Page of requests for a location, newest first
    async fn list_by_location(
        &self,
        location_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<Vec<ServiceRequest>>;

    /// Page of requests in a status, newest first
    async fn list_by_status(
        &self,
        status: RequestStatus,
        page: PaginationParams,
    ) -> AppResult<Vec<ServiceRequest>>;

    /// Move a request to a new status
    async fn update_status(&self, id: Uuid, status: RequestStatus) -> AppResult<ServiceRequest>;

    /// Upload files and record them as attachments
    async fn attach_files(
        &self,
        request_id: Uuid,
        files: Vec<UploadedFile>,
        origin: AttachmentOrigin,
    ) -> AppResult<Vec<AttachmentView>>;
}

/// Concrete implementation of RequestService using Unit of Work.
pub struct RequestManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> RequestManager<U> {
    /// Create new request service instance with Unit of Work
    pub fn new(uow: Arc<U>, notifier: Arc<dyn Notifier>) -> Self {
        Self { uow, notifier }
    }
}

#[async_trait]
impl<U: UnitOfWork> RequestService for RequestManager<U> {
    async fn create_location(&self, location: NewLocation) -> AppResult<Location> {
        self.uow.locations().create(location).await
    }

    async fn list_locations(&self, city: &str, state: &str) -> AppResult<Vec<Location>> {
        self.uow.locations().find_by_city_state(city, state).await
    }

    async fn get_location(&self, id: Uuid) -> AppResult<Location> {
        self.uow.locations().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_request(&self, request: NewServiceRequest) -> AppResult<ServiceRequest> {
        let location_id = request.location_id;

        let (created, location) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let location = ctx
                        .locations()
                        .find_by_id(location_id)
                        .await?
                        .ok_or_not_found()?;

                    let created = ctx.requests().insert(request).await?;

                    Ok((created, location))
                })
            })
            .await?;

        // The row is durable from here on; mail trouble must not surface
        match self.uow.users().admin_contacts().await {
            Ok(admins) => {
                dispatch_request_created(
                    self.notifier.clone(),
                    created.clone(),
                    location,
                    admins,
                );
            }
            Err(e) => {
                tracing::error!(
                    request_id = %created.id,
                    error = %e,
                    "Failed to load admin contacts for notification"
                );
            }
        }

        Ok(created)
    }

    async fn get_request_detail(&self, id: Uuid) -> AppResult<RequestDetail> {
        self.uow.requests().find_detail(id).await
    }

    async fn list_by_location(
        &self,
        location_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<Vec<ServiceRequest>> {
        self.uow
            .requests()
            .list_by_location(location_id, page.limit(), page.offset())
            .await
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
        page: PaginationParams,
    ) -> AppResult<Vec<ServiceRequest>> {
        self.uow
            .requests()
            .list_by_status(status, page.limit(), page.offset())
            .await
    }

    async fn update_status(&self, id: Uuid, status: RequestStatus) -> AppResult<ServiceRequest> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move { ctx.requests().set_status(id, status).await })
            })
            .await
    }

    async fn attach_files(
        &self,
        request_id: Uuid,
        files: Vec<UploadedFile>,
        origin: AttachmentOrigin,
    ) -> AppResult<Vec<AttachmentView>> {
        if files.is_empty() {
            return Err(AppError::bad_request("No files provided"));
        }

        self.uow
            .requests()
            .add_attachments(request_id, files, origin)
            .await
    }
}
