//! Pagination types for list endpoints.

use serde::Deserialize;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters, shared by all list endpoints.
///
/// Pages are 1-indexed on the wire; the zero-based offset is derived as
/// `(page - 1) * limit`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Calculate offset for database query.
    ///
    /// Saturates rather than wrapping; an absurd wire-supplied page just
    /// lands past the last row and returns an empty list.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit())
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_zero_based() {
        let params = PaginationParams { page: 1, limit: 10 };
        assert_eq!(params.offset(), 0);

        let params = PaginationParams { page: 2, limit: 10 };
        assert_eq!(params.offset(), 10);

        let params = PaginationParams { page: 3, limit: 25 };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_page_zero_treated_as_first_page() {
        let params = PaginationParams { page: 0, limit: 10 };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_offset_saturates_on_huge_page() {
        let params = PaginationParams {
            page: u64::MAX,
            limit: 100,
        };
        assert_eq!(params.offset(), u64::MAX);
    }

    #[test]
    fn test_limit_is_capped() {
        let params = PaginationParams {
            page: 1,
            limit: 10_000,
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_limit_floor_is_one() {
        let params = PaginationParams { page: 5, limit: 0 };
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 4);
    }
}
