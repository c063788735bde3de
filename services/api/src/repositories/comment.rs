//! Comment repository for database operations

use async_trait::async_trait;
use blog_common::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::CommentRepository;
use crate::models::{AuthorSummary, Comment, CommentView, NewComment};

#[derive(sqlx::FromRow)]
struct CommentViewRow {
    #[sqlx(flatten)]
    comment: Comment,
    author_name: String,
}

impl From<CommentViewRow> for CommentView {
    fn from(row: CommentViewRow) -> Self {
        CommentView {
            author: AuthorSummary {
                id: row.comment.author_id,
                name: row.author_name,
                email: None,
            },
            comment: row.comment,
        }
    }
}

/// PostgreSQL-backed comment repository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, new_comment: &NewComment) -> DatabaseResult<Comment> {
        info!("Creating comment on post {}", new_comment.post_id);

        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, content, post_id, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, content, post_id, author_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_comment.content)
        .bind(new_comment.post_id)
        .bind(new_comment.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, content, post_id, author_id, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn list_for_post(&self, post_id: Uuid) -> DatabaseResult<Vec<CommentView>> {
        let rows = sqlx::query_as::<_, CommentViewRow>(
            r#"
            SELECT c.id, c.content, c.post_id, c.author_id, c.created_at, c.updated_at,
                   u.name AS author_name
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(rows.into_iter().map(CommentView::from).collect())
    }

    async fn update_content(&self, id: Uuid, content: &str) -> DatabaseResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, content, post_id, author_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_post(&self, post_id: Uuid) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected())
    }
}
