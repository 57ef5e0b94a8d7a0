//! Page envelope and 1-indexed pagination math.
//!
//! Paginated reads report the total matching count alongside the rows so
//! callers can render page controls without a second query.

use serde::{Deserialize, Serialize};

/// Sort direction for timestamp-ordered listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One page of a filtered, ordered listing.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    /// Total rows matching the filter across all pages.
    pub total: i64,
    /// 1-indexed page number this response covers.
    pub page: i64,
    pub page_size: i64,
    /// `ceil(total / page_size)`.
    pub page_count: i64,
}

impl<T> Page<T> {
    pub fn new(rows: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        Self {
            rows,
            total,
            page: page.max(1),
            page_size,
            page_count: page_count(total, page_size),
        }
    }
}

/// SQL OFFSET for a 1-indexed page. Pages below 1 clamp to the first page.
pub fn offset_for_page(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1) * page_size
}

/// Number of pages needed for `total` rows.
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}
