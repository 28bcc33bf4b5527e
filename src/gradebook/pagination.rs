//! Page requests and paged results for listings.

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// A requested page. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number; absent or 0 means the first page.
    #[serde(default)]
    pub page: Option<usize>,
    /// Page size; absent means the configured default.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PageRequest {
    /// Resolves the request to a concrete `(page, limit)` pair, clamping the
    /// limit to `1..=max_limit`.
    pub fn resolve(&self, config: &PaginationConfig) -> (usize, usize) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit.max(1));
        (page, limit)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of matching items.
    pub total: usize,
    /// Page number, from 1.
    pub page: usize,
    /// Page size.
    pub limit: usize,
    /// Number of pages.
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cuts one page out of the full, ordered result.
    pub fn slice(all: Vec<T>, page: usize, limit: usize) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();
        Page {
            items,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        }
    }

    /// Maps the items of the page, keeping its position.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}
