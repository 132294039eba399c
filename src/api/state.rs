//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::{BlobStorage, Cache, Database};
use crate::jobs::Notifier;
use crate::services::{AuthService, RequestService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Request lifecycle service
    pub request_service: Arc<dyn RequestService>,
    /// Redis cache
    pub cache: Arc<Cache>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from infrastructure handles and config.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<Cache>,
        storage: Arc<dyn BlobStorage>,
        notifier: Arc<dyn Notifier>,
        config: crate::config::Config,
    ) -> Self {
        let container = Services::from_connection(
            database.get_connection(),
            storage,
            notifier,
            config,
        );

        Self {
            auth_service: container.auth(),
            request_service: container.requests(),
            cache,
            database,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        request_service: Arc<dyn RequestService>,
        cache: Arc<Cache>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            request_service,
            cache,
            database,
        }
    }
}
