//! Repositories for database operations
//!
//! Each repository is a port with a PostgreSQL implementation and an
//! in-memory one; handlers only see the traits.

use async_trait::async_trait;
use blog_common::DatabaseResult;
use uuid::Uuid;

use crate::models::{
    Category, Comment, CommentView, NewComment, NewPost, PageRequest, Post, PostFilter,
    PostView, UpdatePost,
};

pub mod category;
pub mod comment;
pub mod memory;
pub mod post;

pub use category::PgCategoryRepository;
pub use comment::PgCommentRepository;
pub use memory::{InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryPostRepository};
pub use post::PgPostRepository;

/// Persistence port for posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, new_post: &NewPost) -> DatabaseResult<Post>;

    /// Find a post by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Post>>;

    /// Find a post by ID together with its author and category
    async fn find_view_by_id(&self, id: Uuid) -> DatabaseResult<Option<PostView>>;

    /// One page of posts matching `filter`, newest first, plus the total
    /// number of matching posts
    async fn list(
        &self,
        filter: &PostFilter,
        page: &PageRequest,
    ) -> DatabaseResult<(Vec<PostView>, i64)>;

    /// Apply a partial update; `None` if the post does not exist
    async fn update(&self, id: Uuid, changes: &UpdatePost) -> DatabaseResult<Option<Post>>;

    /// Delete a post; `false` if it did not exist.
    ///
    /// Postgres drops the post's comments in the same statement through the
    /// cascading foreign key.
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

/// Persistence port for comments
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new comment
    async fn create(&self, new_comment: &NewComment) -> DatabaseResult<Comment>;

    /// Find a comment by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Comment>>;

    /// All comments on a post with their authors, newest first
    async fn list_for_post(&self, post_id: Uuid) -> DatabaseResult<Vec<CommentView>>;

    /// Replace a comment's content; `None` if the comment does not exist
    async fn update_content(&self, id: Uuid, content: &str) -> DatabaseResult<Option<Comment>>;

    /// Delete a comment; `false` if it did not exist
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;

    /// Delete every comment on a post, returning how many were removed
    async fn delete_for_post(&self, post_id: Uuid) -> DatabaseResult<u64>;
}

/// Persistence port for categories.
///
/// `create` must report a duplicate name as a unique violation.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, name: &str) -> DatabaseResult<Category>;

    /// All categories ordered by name
    async fn list(&self) -> DatabaseResult<Vec<Category>>;

    /// Find a category by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Category>>;
}
