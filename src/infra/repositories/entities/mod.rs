//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod attachment;
pub mod location;
pub mod service_request;
pub mod staff_user;
pub mod user;
