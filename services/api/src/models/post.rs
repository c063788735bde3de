//! Post models

use blog_auth::Authored;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::view::PostView;

/// Image used when a post is created without one
pub const DEFAULT_FEATURED_IMAGE: &str = "placeholder.jpg";

/// Post entity
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub featured_image: String,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// New post creation payload, already validated
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub featured_image: String,
    pub author_id: Uuid,
    pub category_id: Uuid,
}

/// Post update; `None` leaves a field unchanged. The author is not updatable.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Request for post creation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    pub featured_image: Option<String>,
}

/// Request for a partial post update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostPayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub featured_image: Option<String>,
}

/// Query parameters for post listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostQuery {
    /// Case-insensitive substring matched against title or content
    pub search: Option<String>,
    /// Category identifier
    pub category: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Number of items per page
    pub limit: Option<i64>,
}

/// Listing filter after validation
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
}

impl PostFilter {
    /// Whether a post passes this filter
    pub fn matches(&self, post: &Post) -> bool {
        let category_ok = self
            .category_id
            .is_none_or(|category_id| post.category_id == category_id);

        let search_ok = self.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            post.title.to_lowercase().contains(&term) || post.content.to_lowercase().contains(&term)
        });

        category_ok && search_ok
    }
}

/// Response for post listing with pagination
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub posts: Vec<PostView>,
    pub current_page: u32,
    pub total_pages: i64,
    pub total_posts: i64,
}
