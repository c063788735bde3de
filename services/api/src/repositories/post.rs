//! Post repository for database operations

use async_trait::async_trait;
use blog_common::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::PostRepository;
use crate::models::{
    AuthorSummary, CategorySummary, NewPost, PageRequest, Post, PostFilter, PostView, UpdatePost,
};

/// Posts joined with their author and category
const VIEW_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.featured_image, p.author_id, p.category_id,
           p.created_at, p.updated_at,
           u.name AS author_name, u.email AS author_email, c.name AS category_name
    FROM posts p
    JOIN users u ON u.id = p.author_id
    JOIN categories c ON c.id = p.category_id
"#;

/// `$1` search term and `$2` category id, both optional.
///
/// `position` keeps the search a literal substring match; LIKE would treat
/// % and _ in the term as wildcards.
const LIST_FILTER: &str = r#"
    ($1::text IS NULL
     OR position(lower($1) in lower(p.title)) > 0
     OR position(lower($1) in lower(p.content)) > 0)
    AND ($2::uuid IS NULL OR p.category_id = $2)
"#;

#[derive(sqlx::FromRow)]
struct PostViewRow {
    #[sqlx(flatten)]
    post: Post,
    author_name: String,
    author_email: String,
    category_name: String,
}

impl From<PostViewRow> for PostView {
    fn from(row: PostViewRow) -> Self {
        PostView {
            author: AuthorSummary {
                id: row.post.author_id,
                name: row.author_name,
                email: Some(row.author_email),
            },
            category: CategorySummary {
                id: row.post.category_id,
                name: row.category_name,
            },
            post: row.post,
        }
    }
}

/// PostgreSQL-backed post repository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new post repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, new_post: &NewPost) -> DatabaseResult<Post> {
        info!("Creating post for author {}", new_post.author_id);

        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, title, content, featured_image, author_id, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, content, featured_image, author_id, category_id,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_post.title)
        .bind(&new_post.content)
        .bind(&new_post.featured_image)
        .bind(new_post.author_id)
        .bind(new_post.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Post>> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, featured_image, author_id, category_id,
                   created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn find_view_by_id(&self, id: Uuid) -> DatabaseResult<Option<PostView>> {
        let row = sqlx::query_as::<_, PostViewRow>(&format!("{} WHERE p.id = $1", VIEW_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(row.map(PostView::from))
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page: &PageRequest,
    ) -> DatabaseResult<(Vec<PostView>, i64)> {
        let rows = sqlx::query_as::<_, PostViewRow>(&format!(
            "{} WHERE {} ORDER BY p.created_at DESC LIMIT $3 OFFSET $4",
            VIEW_SELECT, LIST_FILTER
        ))
        .bind(filter.search.as_deref())
        .bind(filter.category_id)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM posts p WHERE {}",
            LIST_FILTER
        ))
        .bind(filter.search.as_deref())
        .bind(filter.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok((rows.into_iter().map(PostView::from).collect(), total))
    }

    async fn update(&self, id: Uuid, changes: &UpdatePost) -> DatabaseResult<Option<Post>> {
        info!("Updating post {}", id);

        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                featured_image = COALESCE($4, featured_image),
                category_id = COALESCE($5, category_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, content, featured_image, author_id, category_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(changes.featured_image.as_deref())
        .bind(changes.category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting post {}", id);

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}
