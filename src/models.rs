//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains the persisted entities, the form structures bound by controller
//! actions, and the view envelopes returned to the client.

pub mod booking;
pub mod catalog;
pub mod feedback;
pub mod tour;
pub mod tour_guide;
pub mod user;

// Re-export commonly used types
pub use booking::*;
pub use catalog::*;
pub use feedback::*;
pub use tour::*;
pub use tour_guide::*;
pub use user::*;

use serde::Serialize;

/// A rendered view: the view name plus the model it displays
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse<T: Serialize> {
    pub success: bool,
    pub view: &'static str,
    pub model: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl<T: Serialize> ViewResponse<T> {
    pub fn new(view: &'static str, model: T) -> Self {
        Self {
            success: true,
            view,
            model,
            search_query: None,
        }
    }

    /// Echo the search box contents back alongside the model
    pub fn with_search(mut self, query: Option<String>) -> Self {
        self.search_query = query;
        self
    }
}

/// One page of a larger result set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T: Serialize> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PagedResult<T> {
    pub fn new(items: Vec<T>, total_items: i64, page_number: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_items + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            items,
            total_items,
            page_number,
            page_size,
            total_pages,
        }
    }
}

/// Normalized paging request: page >= 1, size within 1..=MAX_PAGE_SIZE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits in an `i64`
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

impl PageRequest {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Treat a blank search box the same as no search at all
pub fn search_term(query: &Option<String>) -> Option<&str> {
    query.as_deref().filter(|q| !q.is_empty())
}
