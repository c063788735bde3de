//! API service routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::{get, post, put},
};
use blog_auth::{AuthUser, Authored};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub mod categories;
pub mod comments;
pub mod posts;
pub mod upload;

/// Slack on top of the file limit for multipart framing
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.uploads.max_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route(
            "/api/posts/:id",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/api/posts/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/posts/:id/comments/:comment_id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .merge(blog_auth::routes::create_router::<AppState>())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "blog-api"
    }))
}

/// Parse a path identifier; anything that is not a UUID names nothing
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}

/// Refuse the request unless `user` authored `resource`
pub(crate) fn ensure_author(
    resource: &impl Authored,
    user: &AuthUser,
    message: &str,
) -> Result<(), ApiError> {
    if resource.is_mutable_by(&user.id) {
        Ok(())
    } else {
        warn!("User {} denied mutation of a resource they do not own", user.id);
        Err(ApiError::Forbidden(message.to_string()))
    }
}
