//! Offset pagination shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// A requested window into a newest-first listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PageRequest {
    #[must_use]
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

/// Metadata returned alongside each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    /// `offset + limit < total`.
    pub has_more: bool,
}

impl Pagination {
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let end = u64::from(request.offset) + u64::from(request.limit);
        Self {
            total,
            limit: request.limit,
            offset: request.offset,
            has_more: end < total,
        }
    }
}

/// One page of items plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
