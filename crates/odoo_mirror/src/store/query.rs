use serde::Serialize;

const MIN_PER_PAGE: u64 = 1;
const DEFAULT_PER_PAGE: u64 = 50;

/// Page selection for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (0-indexed).
    pub page: u64,
    pub per_page: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page,
            per_page: per_page.max(MIN_PER_PAGE),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PER_PAGE)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    /// Items across all pages.
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResult<T> {
    pub fn has_next_page(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_page_is_clamped_to_one() {
        assert_eq!(Pagination::new(3, 0).per_page, 1);
        assert_eq!(Pagination::default(), Pagination::new(0, 50));
    }

    #[test]
    fn has_next_page_compares_against_total_pages() {
        let page = PaginatedResult::<u8> {
            items: vec![],
            total: 120,
            page: 1,
            per_page: 50,
            total_pages: 3,
        };
        assert!(page.has_next_page());

        let last = PaginatedResult { page: 2, ..page };
        assert!(!last.has_next_page());
    }
}
