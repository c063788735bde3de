//! Authentication service routes

use axum::{
    Json, Router,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    AuthState,
    error::AuthError,
    gate::AuthGate,
    models::{AuthUser, LoginCredentials, Registration, User},
};

/// Response for registration and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Create the router for the authentication endpoints
pub fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    AuthState: FromRef<S>,
    AuthGate: FromRef<S>,
{
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/users/profile", get(profile))
}

fn issue_response(state: &AuthState, user: User) -> Result<AuthResponse, AuthError> {
    let token = state.jwt_service.issue(user.id).map_err(|e| {
        error!("Failed to generate token: {}", e);
        AuthError::InternalServerError
    })?;

    Ok(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    })
}

/// User registration endpoint
pub async fn register(
    State(state): State<AuthState>,
    WithRejection(Json(payload), _): WithRejection<Json<Registration>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Registration attempt");

    let user = state.credentials.register(&payload).await?;
    let response = issue_response(&state, user)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AuthState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginCredentials>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Login attempt");

    let user = state
        .credentials
        .authenticate(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| {
            warn!("Login failed");
            AuthError::InvalidCredentials
        })?;

    let response = issue_response(&state, user)?;

    Ok((StatusCode::OK, Json(response)))
}

/// Profile of the authenticated user
pub async fn profile(user: AuthUser) -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to your profile!",
        "user": user,
    }))
}
