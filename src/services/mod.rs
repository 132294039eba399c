//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod auth_service;
pub mod container;
mod request_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use request_service::{RequestManager, RequestService};

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use std::sync::Arc;

    use crate::errors::{AppError, AppResult};
    use crate::infra::unit_of_work::{TransactionContext, UnitOfWork};
    use crate::infra::{
        LocationRepository, MockLocationRepository, MockRequestRepository, MockStaffRepository,
        MockUserRepository, RequestRepository, StaffRepository, UserRepository,
    };

    /// Unit-of-work stub backed by mock repositories.
    ///
    /// Transactions need a live database connection, so transactional
    /// flows are exercised at the API/database level; everything else
    /// runs against the mocks.
    pub(crate) struct StubUow {
        users: Arc<MockUserRepository>,
        staff: Arc<MockStaffRepository>,
        locations: Arc<MockLocationRepository>,
        requests: Arc<MockRequestRepository>,
    }

    impl StubUow {
        pub fn new(
            users: MockUserRepository,
            staff: MockStaffRepository,
            locations: MockLocationRepository,
            requests: MockRequestRepository,
        ) -> Self {
            Self {
                users: Arc::new(users),
                staff: Arc::new(staff),
                locations: Arc::new(locations),
                requests: Arc::new(requests),
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for StubUow {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn staff(&self) -> Arc<dyn StaffRepository> {
            self.staff.clone()
        }

        fn locations(&self) -> Arc<dyn LocationRepository> {
            self.locations.clone()
        }

        fn requests(&self) -> Arc<dyn RequestRepository> {
            self.requests.clone()
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            Err(AppError::internal("transactions require a database"))
        }
    }
}
