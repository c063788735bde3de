//! API models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod category;
pub mod comment;
pub mod post;
pub mod view;

pub use category::{Category, CategoryPayload};
pub use comment::{Comment, CommentPayload, NewComment};
pub use post::{
    NewPost, Post, PostFilter, PostListResponse, PostPayload, PostQuery, UpdatePost,
    UpdatePostPayload,
};
pub use view::{AuthorSummary, CategorySummary, CommentView, PostView};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound on items per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page window over a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Normalise raw query values: a page below 1 is page 1 and the limit is
    /// clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX));
        let limit = limit
            .unwrap_or(i64::from(DEFAULT_PAGE_SIZE))
            .clamp(1, i64::from(MAX_PAGE_SIZE));

        Self {
            page: page as u32,
            limit: limit as u32,
        }
    }

    /// Number of items to skip
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        let limit = i64::from(self.limit);
        (total + limit - 1) / limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
