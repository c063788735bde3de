//! Read models: posts and comments with their related records filled in

use serde::Serialize;
use uuid::Uuid;

use super::{Comment, Post};

/// Author shown next to a post or comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    /// Only present on the single-post view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Category shown next to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

/// A post with its author and category
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorSummary,
    pub category: CategorySummary,
}

impl PostView {
    /// Drop the author's email, as listings show only the name
    pub fn without_author_email(mut self) -> Self {
        self.author.email = None;
        self
    }
}

/// A comment with its author
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: AuthorSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn post_view_keeps_the_post_fields_at_the_top_level() {
        let author_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let view = PostView {
            post: Post {
                id: Uuid::new_v4(),
                title: "Ownership".to_string(),
                content: "Borrowing explained".to_string(),
                featured_image: "placeholder.jpg".to_string(),
                author_id,
                category_id,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            author: AuthorSummary {
                id: author_id,
                name: "Alice".to_string(),
                email: Some("alice@x.com".to_string()),
            },
            category: CategorySummary {
                id: category_id,
                name: "Rust".to_string(),
            },
        };

        let full = serde_json::to_value(&view).unwrap();
        assert_eq!(full["title"], "Ownership");
        assert_eq!(full["authorId"], author_id.to_string());
        assert_eq!(full["author"]["name"], "Alice");
        assert_eq!(full["author"]["email"], "alice@x.com");
        assert_eq!(full["category"]["name"], "Rust");

        let listed = serde_json::to_value(view.without_author_email()).unwrap();
        assert!(listed["author"].get("email").is_none());
    }
}
