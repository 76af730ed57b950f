//! Page/limit parsing and page-count math for list endpoints.

use serde::Serialize;

/// Page used when `page` is absent or unusable.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when `limit` is absent or unusable.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on page size.
pub const MAX_LIMIT: i64 = 100;

/// Parse a raw query value as a positive integer.
///
/// Missing, non-numeric, zero and negative values all fall back to `default`.
pub fn parse_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(default)
}

/// Number of pages needed to hold `total` items, `ceil(total / limit)`.
pub fn page_count(total: i64, limit: i64) -> i64 {
    if limit <= 0 || total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build from raw `page` / `limit` query strings, applying defaults and
    /// capping `limit` at [`MAX_LIMIT`].
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page, DEFAULT_PAGE),
            limit: parse_positive(limit, DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }

    /// Rows to skip: `(page - 1) * limit`.
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination block returned alongside list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: page_count(total, request.limit),
        }
    }
}
