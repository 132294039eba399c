//! Shared types used across layers.

mod pagination;
mod response;

pub use pagination::PaginationParams;
pub use response::MessageResponse;
