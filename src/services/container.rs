//! Service container.
//!
//! Handlers reach services through this trait, so tests can swap in
//! mock implementations without touching the router.

use std::sync::Arc;

use super::{AuthService, RequestService};
use crate::config::Config;
use crate::infra::{BlobStorage, Persistence};
use crate::jobs::Notifier;

/// Access point for the application services.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn requests(&self) -> Arc<dyn RequestService>;
}

/// Production container holding the real service implementations.
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    request_service: Arc<dyn RequestService>,
}

impl Services {
    /// Build from pre-constructed services; tests use this with mocks.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        request_service: Arc<dyn RequestService>,
    ) -> Self {
        Self {
            auth_service,
            request_service,
        }
    }

    /// Wire the full service graph from live infrastructure.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        storage: Arc<dyn BlobStorage>,
        notifier: Arc<dyn Notifier>,
        config: Config,
    ) -> Self {
        use super::{Authenticator, RequestManager};

        let uow = Arc::new(Persistence::new(db, storage));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let request_service = Arc::new(RequestManager::new(uow, notifier));

        Self {
            auth_service,
            request_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn requests(&self) -> Arc<dyn RequestService> {
        self.request_service.clone()
    }
}
