//! Pagination
//!
//! Page/limit handling shared by every list endpoint.

use serde::Serialize;

use super::DomainError;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_PAGE: u32 = 1;

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Build from optional query values, rejecting zero and capping `limit`
    pub fn new(page: Option<u32>, limit: Option<u32>, max_limit: u32) -> Result<Self, DomainError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if page == 0 {
            return Err(DomainError::validation("page must be at least 1"));
        }
        if limit == 0 {
            return Err(DomainError::validation("limit must be at least 1"));
        }

        Ok(Self {
            page,
            limit: limit.min(max_limit.max(1)),
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Slice an already-sorted collection
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(self.limit as usize)
            .cloned()
            .collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pagination block of a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u32,
    pub total: u64,
    pub total_pages: u64,
}

/// One page of results
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let limit = u64::from(request.limit);
        Self {
            items,
            pagination: Pagination {
                current: request.page,
                total,
                total_pages: total.div_ceil(limit),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::new(None, None, 100).unwrap();
        assert_eq!(request, PageRequest { page: 1, limit: 10 });
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_zero_rejected_and_limit_capped() {
        assert!(PageRequest::new(Some(0), None, 100).is_err());
        assert!(PageRequest::new(None, Some(0), 100).is_err());
        assert_eq!(PageRequest::new(Some(2), Some(500), 100).unwrap().limit, 100);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(Some(3), Some(10), 100).unwrap();
        let page: Page<u8> = Page::new(vec![], 21, request);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.current, 3);

        let page: Page<u8> = Page::new(vec![], 0, request);
        assert_eq!(page.pagination.total_pages, 0);
    }

    #[test]
    fn test_slice() {
        let items: Vec<u32> = (0..25).collect();
        let request = PageRequest::new(Some(3), Some(10), 100).unwrap();
        assert_eq!(request.slice(&items), vec![20, 21, 22, 23, 24]);
    }
}
