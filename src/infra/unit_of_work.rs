//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and manages transaction lifecycle.
//! Multi-step writes (creating a request, moving its status) run inside a
//! transaction so partial updates never become visible.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    LocationRepository, LocationStore, RequestRepository, RequestStore, StaffRepository,
    StaffStore, UserRepository, UserStore,
};
use super::storage::BlobStorage;
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the repository or service level.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get staff repository
    fn staff(&self) -> Arc<dyn StaffRepository>;

    /// Get location repository
    fn locations(&self) -> Arc<dyn LocationRepository>;

    /// Get service request repository
    fn requests(&self) -> Arc<dyn RequestRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    /// Uses ReadCommitted isolation for balanced consistency/performance.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction. The context borrows the transaction
/// to ensure proper lifetime management.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get location repository for this transaction
    pub fn locations(&self) -> TxLocationRepository<'_> {
        TxLocationRepository::new(self.txn)
    }

    /// Get service request repository for this transaction
    pub fn requests(&self) -> TxRequestRepository<'_> {
        TxRequestRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    staff_repo: Arc<StaffStore>,
    location_repo: Arc<LocationStore>,
    request_repo: Arc<RequestStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection, storage: Arc<dyn BlobStorage>) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let staff_repo = Arc::new(StaffStore::new(db.clone()));
        let location_repo = Arc::new(LocationStore::new(db.clone()));
        let request_repo = Arc::new(RequestStore::new(db.clone(), storage));
        Self {
            db,
            user_repo,
            staff_repo,
            location_repo,
            request_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn staff(&self) -> Arc<dyn StaffRepository> {
        self.staff_repo.clone()
    }

    fn locations(&self) -> Arc<dyn LocationRepository> {
        self.location_repo.clone()
    }

    fn requests(&self) -> Arc<dyn RequestRepository> {
        self.request_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware location repository.
///
/// Executes all operations within the provided transaction.
pub struct TxLocationRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxLocationRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find location by ID
    pub async fn find_by_id(&self, id: uuid::Uuid) -> AppResult<Option<crate::domain::Location>> {
        use super::repositories::entities::location::Entity as LocationEntity;
        use sea_orm::EntityTrait;

        let result = LocationEntity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(crate::domain::Location::from))
    }
}

/// Transaction-aware service request repository.
pub struct TxRequestRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxRequestRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert a new request. The database assigns the order number and
    /// creation timestamp; the status always starts at `criado`.
    pub async fn insert(
        &self,
        request: crate::domain::NewServiceRequest,
    ) -> AppResult<crate::domain::ServiceRequest> {
        use super::repositories::entities::service_request::ActiveModel;
        use crate::domain::RequestStatus;
        use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};

        let active_model = ActiveModel {
            id: Set(uuid::Uuid::new_v4()),
            order_number: NotSet,
            location_id: Set(request.location_id),
            subject: Set(request.subject),
            requester_name: Set(request.requester_name),
            requester_email: Set(request.requester_email),
            requester_phone: Set(request.requester_phone),
            description: Set(request.description),
            unit_name: Set(request.unit_name),
            priority: Set(request.priority.as_str().to_string()),
            status: Set(RequestStatus::Created.as_str().to_string()),
            additional_info: Set(request.additional_info),
            created_at: NotSet,
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;

        crate::domain::ServiceRequest::try_from(model)
    }

    /// Set the status of an existing request
    pub async fn set_status(
        &self,
        id: uuid::Uuid,
        status: crate::domain::RequestStatus,
    ) -> AppResult<crate::domain::ServiceRequest> {
        use super::repositories::entities::service_request::{ActiveModel, Entity as RequestEntity};
        use sea_orm::{ActiveModelTrait, EntityTrait, Set};

        let existing = RequestEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());

        let model = active.update(self.txn).await.map_err(AppError::from)?;

        crate::domain::ServiceRequest::try_from(model)
    }
}
