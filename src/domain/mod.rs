//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod account;
pub mod location;
pub mod password;
pub mod request;

pub use account::{Account, AccountResponse, AdminContact, Role, StaffUser, User};
pub use location::{Location, NewLocation};
pub use password::Password;
pub use request::{
    AttachmentOrigin, AttachmentView, NewServiceRequest, Priority, RequestDetail, RequestStatus,
    ServiceRequest,
};
