//! HTTP request handlers.

pub mod auth_handler;
pub mod location_handler;
pub mod request_handler;
pub mod staff_handler;

pub use auth_handler::{account_routes, auth_routes};
pub use request_handler::request_routes;
pub use staff_handler::staff_routes;
