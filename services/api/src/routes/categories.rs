//! Category endpoints

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use blog_auth::AuthUser;
use tracing::{info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{Category, CategoryPayload},
    validation,
};

/// All categories, ordered by name
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.list().await?))
}

/// Create a category
pub async fn create_category(
    user: AuthUser,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryPayload>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let name = payload.name.trim();
    validation::validate_category_name(name).map_err(ApiError::BadRequest)?;

    match state.categories.create(name).await {
        Ok(category) => {
            info!("User {} created category {}", user.id, category.id);
            Ok((StatusCode::CREATED, Json(category)))
        }
        Err(e) if e.is_unique_violation() => {
            warn!("Category {:?} already exists", name);
            Err(ApiError::Conflict("Category already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
