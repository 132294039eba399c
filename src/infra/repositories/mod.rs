//! Repository traits and their SeaORM-backed implementations.

pub mod entities;
pub mod location_repository;
pub mod request_repository;
pub mod staff_repository;
pub mod user_repository;

pub use location_repository::{LocationRepository, LocationStore};
pub use request_repository::{RequestRepository, RequestStore};
pub use staff_repository::{StaffRepository, StaffStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(test)]
pub use location_repository::MockLocationRepository;
#[cfg(test)]
pub use request_repository::MockRequestRepository;
#[cfg(test)]
pub use staff_repository::MockStaffRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
