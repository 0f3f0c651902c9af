//! Pagination query parsing and response envelope.

use serde::{Deserialize, Serialize};

use botica_core::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Raw `?page=&limit=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Normalized paging values ready to bind into a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub limit: u32,
}

impl Paging {
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl PageQuery {
    /// Applies defaults and bounds: page >= 1, 1 <= limit <= MAX_PAGE_SIZE.
    pub fn normalize(&self) -> Paging {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Paging { page, limit }
    }
}

/// Pagination metadata attached to every list response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(paging: Paging, total: i64) -> Self {
        let limit = i64::from(paging.limit);
        Pagination {
            page: paging.page,
            limit: paging.limit,
            total,
            pages: (total + limit - 1) / limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_are_absent() {
        let paging = PageQuery::default().normalize();
        assert_eq!(paging, Paging { page: 1, limit: 10 });
        assert_eq!(paging.offset(), 0);
    }

    #[test]
    fn limit_is_clamped_to_the_maximum() {
        let query = PageQuery {
            page: Some(2),
            limit: Some(5000),
        };
        let paging = query.normalize();
        assert_eq!(paging.limit, 100);
        assert_eq!(paging.offset(), 100);
    }

    #[test]
    fn zero_values_are_corrected() {
        let query = PageQuery {
            page: Some(0),
            limit: Some(0),
        };
        let paging = query.normalize();
        assert_eq!(paging, Paging { page: 1, limit: 1 });
    }

    #[test]
    fn pages_is_the_ceiling_of_total_over_limit() {
        let paging = Paging { page: 1, limit: 10 };

        assert_eq!(Pagination::new(paging, 0).pages, 0);
        assert_eq!(Pagination::new(paging, 1).pages, 1);
        assert_eq!(Pagination::new(paging, 10).pages, 1);
        assert_eq!(Pagination::new(paging, 11).pages, 2);
        assert_eq!(Pagination::new(paging, 95).pages, 10);
    }
}
