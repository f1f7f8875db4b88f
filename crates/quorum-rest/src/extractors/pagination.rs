//! Pagination query extractor.

use quorum_core::PageRequest;
use serde::Deserialize;

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationQuery {
    /// The page number (0-indexed).
    pub page: Option<usize>,
    /// The number of items per page.
    pub size: Option<usize>,
}

impl From<PaginationQuery> for PageRequest {
    fn from(query: PaginationQuery) -> Self {
        Self::new(
            query.page.unwrap_or(0),
            query.size.unwrap_or(Self::DEFAULT_SIZE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request: PageRequest = PaginationQuery::default().into();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, PageRequest::DEFAULT_SIZE);
    }

    #[test]
    fn test_explicit_values() {
        let query = PaginationQuery {
            page: Some(2),
            size: Some(5),
        };
        let request: PageRequest = query.into();
        assert_eq!(request.page, 2);
        assert_eq!(request.size, 5);
    }

    #[test]
    fn test_size_clamped() {
        let query = PaginationQuery {
            page: Some(0),
            size: Some(10_000),
        };
        let request: PageRequest = query.into();
        assert_eq!(request.size, PageRequest::MAX_SIZE);
    }
}
