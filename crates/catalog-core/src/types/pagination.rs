//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 100;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 200;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request, clamped to the built-in bounds.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self::bounded(page, page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    /// Create a page request with explicit bounds.
    ///
    /// A page below 1 becomes 1, a page size below 1 becomes `default_size`,
    /// and any page size above `max_size` is clamped to it.
    pub fn bounded(page: u64, page_size: u64, default_size: u64, max_size: u64) -> Self {
        let page_size = if page_size < 1 {
            default_size
        } else {
            page_size
        };
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, max_size.max(1)),
        }
    }

    /// Calculate the SQL `OFFSET` value.
    ///
    /// Saturates instead of overflowing for very large page numbers.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// `OFFSET` as a signed SQL bind value, clamped to `i64::MAX`.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset()).unwrap_or(i64::MAX)
    }

    /// `LIMIT` as a signed SQL bind value, clamped to `i64::MAX`.
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit()).unwrap_or(i64::MAX)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T: Serialize> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
}

impl<T: Serialize> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, page: &PageRequest, total_items: u64) -> Self {
        let total_pages = if total_items == 0 {
            1
        } else {
            total_items.div_ceil(page.page_size.max(1))
        };
        Self {
            items,
            page: page.page,
            page_size: page.page_size,
            total_items,
            total_pages,
            has_next: page.page < total_pages,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_applied() {
        let page = PageRequest::bounded(0, 0, 100, 200);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);

        let page = PageRequest::bounded(3, 5_000, 100, 200);
        assert_eq!(page.page_size, 200);
        assert_eq!(page.offset(), 400);
    }

    #[test]
    fn test_response_page_counts() {
        let page = PageRequest::new(2, 10);
        let response = PageResponse::new(vec![1, 2, 3], &page, 23);
        assert_eq!(response.total_pages, 3);
        assert!(response.has_next);

        let empty: PageResponse<u8> = PageResponse::new(Vec::new(), &PageRequest::default(), 0);
        assert_eq!(empty.total_pages, 1);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_huge_page_saturates_offset() {
        let page = PageRequest::new(u64::MAX, 100);
        assert_eq!(page.offset(), u64::MAX);
        assert_eq!(page.sql_offset(), i64::MAX);
        assert_eq!(page.sql_limit(), 100);

        let response: PageResponse<u8> = PageResponse::new(Vec::new(), &page, 5);
        assert_eq!(response.total_pages, 1);
        assert!(!response.has_next);
    }
}
