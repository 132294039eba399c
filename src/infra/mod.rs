//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Blob storage for attachments
//! - Caching systems (Redis)
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{
    LocationRepository, LocationStore, RequestRepository, RequestStore, StaffRepository,
    StaffStore, UserRepository, UserStore,
};
pub use storage::{BlobStorage, SupabaseStorage, UploadedFile};
pub use unit_of_work::{
    Persistence, TransactionContext, TxLocationRepository, TxRequestRepository, UnitOfWork,
};

#[cfg(test)]
pub use repositories::{
    MockLocationRepository, MockRequestRepository, MockStaffRepository, MockUserRepository,
};
#[cfg(test)]
pub use storage::MockBlobStorage;
