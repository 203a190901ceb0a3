//! Pagination arithmetic
//!
//! Pages are 1-based. Per-page size is bounded so listings stay bounded;
//! out-of-range pages yield empty item lists rather than errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{FacadeError, FacadeResult};

/// Maximum page size the facade will serve
pub const MAX_PER_PAGE: u64 = 1000;

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

/// Page selection for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

impl PageRequest {
    /// Creates a page request
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Validates the request bounds
    pub fn validate(&self) -> FacadeResult<()> {
        if self.page == 0 {
            return Err(FacadeError::InvalidPage(
                "page numbers start at 1".to_string(),
            ));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(FacadeError::InvalidPage(format!(
                "per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        Ok(())
    }

    /// Number of items skipped before this page
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1) * self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

/// One page of results with pagination bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Value>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Page {
    /// Assembles a page from the page slice and the full filtered count
    pub fn new(items: Vec<Value>, request: &PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages: total_pages(total, request.per_page),
        }
    }
}

/// Ceiling division for page counts; zero items yield zero pages
pub fn total_pages(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}
