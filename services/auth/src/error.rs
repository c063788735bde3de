//! HTTP errors for the authentication routes and the auth gate

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::credentials::CredentialError;

/// Custom error type for authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Duplicate unique field
    #[error("{0}")]
    Conflict(String),

    /// Login failed; never says which half of the credentials was wrong
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, invalid or expired bearer token, or unknown subject
    #[error("Not authorized")]
    Unauthorized,

    /// Unexpected failure; detail is logged, not returned
    #[error("Internal server error")]
    InternalServerError,
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Validation(message) => AuthError::Validation(message),
            CredentialError::DuplicateEmail => AuthError::Conflict("User already exists".to_string()),
            other => {
                error!("Credential store failure: {}", other);
                AuthError::InternalServerError
            }
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Validation(_) | AuthError::Conflict(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
