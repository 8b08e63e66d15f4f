//! Pagination related types for list endpoints

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound for `page_size`
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page-number pagination parameters (`?page=2&page_size=20`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Number of items per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl Pagination {
    /// Create a pagination, clamping out-of-range values
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Sanitize values that came straight from a query string
    pub fn normalized(self) -> Self {
        Self::new(self.page, self.page_size)
    }

    /// Offset for database queries
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Limit for database queries
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Total number of matching items
    pub count: u64,

    /// Current page number
    pub page: u32,

    /// Items per page
    pub page_size: u32,

    /// Total number of pages
    pub total_pages: u32,

    /// Items on this page
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(results: Vec<T>, pagination: Pagination, count: u64) -> Self {
        let total_pages = if count == 0 {
            0
        } else {
            count.div_ceil(u64::from(pagination.page_size)) as u32
        };

        Self {
            count,
            page: pagination.page,
            page_size: pagination.page_size,
            total_pages,
            results,
        }
    }

    /// Map the items, keeping the page metadata
    pub fn map<U, F>(self, f: F) -> PaginatedResponse<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResponse {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            results: self.results.into_iter().map(f).collect(),
        }
    }

    /// Paginate an already filtered, already ordered collection in memory
    pub fn from_vec(items: Vec<T>, pagination: Pagination) -> Self {
        let count = items.len() as u64;
        let results = items
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();
        Self::new(results, pagination, count)
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination::new(0, 1000);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, MAX_PAGE_SIZE);

        let p = Pagination { page: 3, page_size: 0 }.normalized();
        assert_eq!(p.page_size, 1);
        assert_eq!(p.offset(), 2);
    }

    #[test]
    fn test_offset_and_limit() {
        let p = Pagination::new(3, 20);
        assert_eq!(p.offset(), 40);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_from_vec_slices_page() {
        let items: Vec<u32> = (1..=25).collect();
        let page = PaginatedResponse::from_vec(items, Pagination::new(3, 10));
        assert_eq!(page.count, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_empty_page() {
        let page: PaginatedResponse<u32> = PaginatedResponse::from_vec(vec![], Pagination::default());
        assert_eq!(page.count, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.results.is_empty());
    }
}
