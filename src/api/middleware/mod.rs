//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{
    auth_middleware, optional_auth_middleware, require_admin, require_admin_caller,
    require_staff, CurrentUser,
};
pub use rate_limit::{rate_limit_auth_middleware, rate_limit_middleware};
