//! Page request normalization.
//!
//! The HTTP layer speaks in 1-based `page` / `page_size`; stores speak in
//! `skip` / `limit`. [`PageRequest`] converts between the two and applies the
//! bounds shared by both catalog backends.

use crate::defaults::{FIRST_PAGE, MAX_PAGE_SIZE, PAGE_SIZE};
use crate::error::{Error, Result};

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            page_size: PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a page request from optional query parameters.
    ///
    /// `page` defaults to 1 and must be >= 1. `page_size` defaults to 20,
    /// must be >= 1, and is clamped to 100.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Result<Self> {
        let page = page.unwrap_or(FIRST_PAGE);
        if page < FIRST_PAGE {
            return Err(Error::InvalidInput("page must be >= 1".into()));
        }

        let page_size = page_size.unwrap_or(PAGE_SIZE);
        if page_size < 1 {
            return Err(Error::InvalidInput("page_size must be >= 1".into()));
        }

        Ok(Self {
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Number of items before this page.
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Maximum number of items on this page.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Clamp a store-level `limit` to `1..=100`.
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_PAGE_SIZE)
}

/// Clamp a store-level `skip` to be non-negative.
pub fn clamp_skip(skip: i64) -> i64 {
    skip.max(0)
}
