//! Post endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use blog_auth::AuthUser;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::{ensure_author, parse_id};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{
        NewPost, PageRequest, Post, PostFilter, PostListResponse, PostPayload, PostQuery,
        PostView, UpdatePost, UpdatePostPayload, post::DEFAULT_FEATURED_IMAGE,
    },
    validation,
};

const POST_NOT_FOUND: &str = "Post not found";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve a category reference from a request body to an existing category
async fn existing_category(state: &AppState, raw: &str) -> ApiResult<Uuid> {
    let category_id = validation::parse_category_id(raw).map_err(ApiError::BadRequest)?;

    if state.categories.find_by_id(category_id).await?.is_none() {
        return Err(ApiError::BadRequest("Category not found".to_string()));
    }

    Ok(category_id)
}

async fn find_post(state: &AppState, raw_id: &str) -> ApiResult<Post> {
    let id = parse_id(raw_id, POST_NOT_FOUND)?;
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(POST_NOT_FOUND.to_string()))
}

/// List posts with optional search, category filter and pagination
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostQuery>,
) -> ApiResult<Json<PostListResponse>> {
    let category_id = match non_blank(query.category) {
        Some(raw) => Some(Uuid::parse_str(&raw).map_err(|_| {
            ApiError::BadRequest("Invalid Category ID format for filtering.".to_string())
        })?),
        None => None,
    };

    let filter = PostFilter {
        search: non_blank(query.search),
        category_id,
    };
    let page = PageRequest::new(query.page, query.limit);

    let (posts, total) = state.posts.list(&filter, &page).await?;

    Ok(Json(PostListResponse {
        posts: posts
            .into_iter()
            .map(PostView::without_author_email)
            .collect(),
        current_page: page.page,
        total_pages: page.total_pages(total),
        total_posts: total,
    }))
}

/// Get a single post with its author and category
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PostView>> {
    let id = parse_id(&id, POST_NOT_FOUND)?;
    state
        .posts
        .find_view_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(POST_NOT_FOUND.to_string()))
}

/// Create a post authored by the caller
pub async fn create_post(
    user: AuthUser,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<PostPayload>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let title = payload.title.trim();
    let content = payload.content.trim();

    validation::validate_title(title).map_err(ApiError::BadRequest)?;
    validation::validate_content(content).map_err(ApiError::BadRequest)?;
    let category_id = existing_category(&state, &payload.category).await?;

    let new_post = NewPost {
        title: title.to_string(),
        content: content.to_string(),
        featured_image: non_blank(payload.featured_image)
            .unwrap_or_else(|| DEFAULT_FEATURED_IMAGE.to_string()),
        author_id: user.id,
        category_id,
    };

    let post = state.posts.create(&new_post).await?;
    info!("User {} created post {}", user.id, post.id);

    Ok((StatusCode::CREATED, Json(post)))
}

/// Update a post; only its author may do so
pub async fn update_post(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdatePostPayload>, ApiError>,
) -> ApiResult<Json<Post>> {
    let post = find_post(&state, &id).await?;
    ensure_author(&post, &user, "User not authorized to update this post")?;

    let title = payload.title.map(|t| t.trim().to_string());
    if let Some(title) = &title {
        validation::validate_title(title).map_err(ApiError::BadRequest)?;
    }

    let content = payload.content.map(|c| c.trim().to_string());
    if let Some(content) = &content {
        validation::validate_content(content).map_err(ApiError::BadRequest)?;
    }

    let category_id = match &payload.category {
        Some(raw) => Some(existing_category(&state, raw).await?),
        None => None,
    };

    let changes = UpdatePost {
        title,
        content,
        featured_image: non_blank(payload.featured_image),
        category_id,
    };

    let updated = state
        .posts
        .update(post.id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound(POST_NOT_FOUND.to_string()))?;

    Ok(Json(updated))
}

/// Delete a post and its comments; only its author may do so
pub async fn delete_post(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let post = find_post(&state, &id).await?;
    ensure_author(&post, &user, "User not authorized to delete this post")?;

    // Postgres drops the comments with the post; the second call only
    // matters for stores without a cascading key.
    if !state.posts.delete(post.id).await? {
        warn!("Post {} vanished before it could be deleted", post.id);
        return Err(ApiError::NotFound(POST_NOT_FOUND.to_string()));
    }
    let removed_comments = state.comments.delete_for_post(post.id).await?;

    info!(
        "User {} deleted post {} with {} comments",
        user.id, post.id, removed_comments
    );

    Ok(Json(json!({
        "id": post.id,
        "message": "Post removed successfully",
    })))
}
