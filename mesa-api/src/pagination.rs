/// List windowing shared by every list endpoint
///
/// Query parameters `page` and `records_per_page` select a window into
/// the collection; out-of-range values are silently normalized (floored
/// at 1), never surfaced as errors. Every list response is the same
/// envelope: the total count alongside the sliced window.
use serde::{Deserialize, Serialize};

const DEFAULT_RECORDS_PER_PAGE: u32 = 10;

/// Pagination query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    /// 1-based page number (default: 1)
    pub page: Option<u32>,

    /// Window size (default: 10)
    pub records_per_page: Option<u32>,
}

impl PageParams {
    /// Normalized page number
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Normalized window size
    pub fn records_per_page(&self) -> u32 {
        self.records_per_page.unwrap_or(DEFAULT_RECORDS_PER_PAGE).max(1)
    }

    /// Computes the `(offset, limit)` window for the store
    pub fn window(&self) -> (i64, i64) {
        let per_page = i64::from(self.records_per_page());
        let offset = (i64::from(self.page()) - 1) * per_page;
        (offset, per_page)
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    /// Total records matching the filter, across all pages
    pub total_count: i64,

    /// The requested window, in insertion order
    pub items: Vec<T>,
}
