//! Comment endpoints, nested under a post

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use blog_auth::AuthUser;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{ensure_author, parse_id};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{Comment, CommentPayload, CommentView, NewComment},
    validation,
};

const POST_NOT_FOUND: &str = "Post not found";
const COMMENT_NOT_FOUND: &str = "Comment not found";

async fn existing_post(state: &AppState, raw_id: &str) -> ApiResult<Uuid> {
    let id = parse_id(raw_id, POST_NOT_FOUND)?;
    match state.posts.find_by_id(id).await? {
        Some(post) => Ok(post.id),
        None => Err(ApiError::NotFound(POST_NOT_FOUND.to_string())),
    }
}

/// A comment addressed through its post; a comment on another post is not found
async fn find_comment(state: &AppState, raw_post_id: &str, raw_id: &str) -> ApiResult<Comment> {
    let post_id = existing_post(state, raw_post_id).await?;
    let id = parse_id(raw_id, COMMENT_NOT_FOUND)?;

    state
        .comments
        .find_by_id(id)
        .await?
        .filter(|comment| comment.post_id == post_id)
        .ok_or_else(|| ApiError::NotFound(COMMENT_NOT_FOUND.to_string()))
}

/// List the comments on a post with their authors, newest first
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<Vec<CommentView>>> {
    let post_id = existing_post(&state, &post_id).await?;
    Ok(Json(state.comments.list_for_post(post_id).await?))
}

/// Comment on a post as the caller
pub async fn create_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<CommentPayload>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let post_id = existing_post(&state, &post_id).await?;

    let content = payload.content.trim();
    validation::validate_comment(content).map_err(ApiError::BadRequest)?;

    let comment = state
        .comments
        .create(&NewComment {
            content: content.to_string(),
            post_id,
            author_id: user.id,
        })
        .await?;
    info!("User {} commented on post {}", user.id, post_id);

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Edit a comment; only its author may do so
pub async fn update_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(String, String)>,
    WithRejection(Json(payload), _): WithRejection<Json<CommentPayload>, ApiError>,
) -> ApiResult<Json<Comment>> {
    let comment = find_comment(&state, &post_id, &comment_id).await?;
    ensure_author(&comment, &user, "User not authorized to update this comment")?;

    let content = payload.content.trim();
    validation::validate_comment(content).map_err(ApiError::BadRequest)?;

    let updated = state
        .comments
        .update_content(comment.id, content)
        .await?
        .ok_or_else(|| ApiError::NotFound(COMMENT_NOT_FOUND.to_string()))?;

    Ok(Json(updated))
}

/// Delete a comment; only its author may do so
pub async fn delete_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let comment = find_comment(&state, &post_id, &comment_id).await?;
    ensure_author(&comment, &user, "User not authorized to delete this comment")?;

    if !state.comments.delete(comment.id).await? {
        return Err(ApiError::NotFound(COMMENT_NOT_FOUND.to_string()));
    }

    Ok(Json(json!({
        "id": comment.id,
        "message": "Comment removed successfully",
    })))
}
