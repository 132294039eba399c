//! Repository for service requests and their attachments.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::attachment;
use super::entities::service_request::{self, Entity as RequestEntity};
use crate::domain::{
    AttachmentOrigin, AttachmentView, RequestDetail, RequestStatus, ServiceRequest,
};
use crate::errors::{AppError, AppResult};
use crate::infra::storage::{BlobStorage, UploadedFile};

#[cfg(test)]
use mockall::automock;

/// Service request repository trait for dependency injection.
///
/// Writes that must be atomic with other steps (insert, status moves) live
/// on the transaction-scoped repositories instead.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Fetch a request together with signed URLs for its attachments.
    ///
    /// Fails with `NotFound` when the request does not exist.
    async fn find_detail(&self, id: Uuid) -> AppResult<RequestDetail>;

    /// Page of requests for one location, newest first
    async fn list_by_location(
        &self,
        location_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ServiceRequest>>;

    /// Page of requests in one status, newest first
    async fn list_by_status(
        &self,
        status: RequestStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ServiceRequest>>;

    /// Upload files and record them as attachments of a request.
    ///
    /// Each file's upload+record pair is its own atomic unit: a failure
    /// aborts the batch but leaves earlier attachments durably recorded.
    async fn add_attachments(
        &self,
        request_id: Uuid,
        files: Vec<UploadedFile>,
        origin: AttachmentOrigin,
    ) -> AppResult<Vec<AttachmentView>>;
}

/// SeaORM-backed request store.
///
/// Holds the blob storage gateway so display projections can resolve
/// signed attachment URLs.
pub struct RequestStore {
    db: DatabaseConnection,
    storage: Arc<dyn BlobStorage>,
}

impl RequestStore {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn BlobStorage>) -> Self {
        Self { db, storage }
    }
}

#[async_trait]
impl RequestRepository for RequestStore {
    async fn find_detail(&self, id: Uuid) -> AppResult<RequestDetail> {
        let model = RequestEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let attachment_rows = model
            .find_related(attachment::Entity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut attachments = Vec::with_capacity(attachment_rows.len());
        for row in attachment_rows {
            let url = self.storage.signed_url(&row.storage_path).await;
            attachments.push(AttachmentView {
                id: row.id,
                title: row.title,
                url,
            });
        }

        Ok(RequestDetail {
            request: ServiceRequest::try_from(model)?,
            attachments,
        })
    }

    async fn list_by_location(
        &self,
        location_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ServiceRequest>> {
        let models = RequestEntity::find()
            .filter(service_request::Column::LocationId.eq(location_id))
            .order_by_desc(service_request::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(ServiceRequest::try_from).collect()
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ServiceRequest>> {
        let models = RequestEntity::find()
            .filter(service_request::Column::Status.eq(status.as_str()))
            .order_by_desc(service_request::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(ServiceRequest::try_from).collect()
    }

    async fn add_attachments(
        &self,
        request_id: Uuid,
        files: Vec<UploadedFile>,
        origin: AttachmentOrigin,
    ) -> AppResult<Vec<AttachmentView>> {
        // The owning request must exist before anything is uploaded
        RequestEntity::find_by_id(request_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut views = Vec::with_capacity(files.len());

        for file in files {
            let path = self.storage.upload(&file).await?;

            // If this insert fails the uploaded blob is orphaned; that leak
            // is accepted, cleanup is an operational concern.
            let active_model = attachment::ActiveModel {
                id: Set(Uuid::new_v4()),
                title: Set(file.filename.clone()),
                storage_path: Set(path.clone()),
                origin: Set(origin.as_str().to_string()),
                request_id: Set(request_id),
            };
            let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

            let url = self.storage.signed_url(&path).await;
            views.push(AttachmentView {
                id: model.id,
                title: model.title,
                url,
            });
        }

        Ok(views)
    }
}
