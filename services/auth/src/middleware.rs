//! Request extractors backed by the auth gate
//!
//! Handlers that need an identity take [`AuthUser`] as an argument; the
//! identity is passed to them as a typed value instead of being stashed in
//! request extensions.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    error::AuthError,
    gate::{AuthGate, GateOutcome},
    models::AuthUser,
};

/// Read the bearer token from the `Authorization` header.
///
/// A missing header is `Ok(None)`; a header that is present but not a bearer
/// credential is rejected.
async fn bearer_token(parts: &mut Parts) -> Result<Option<String>, AuthError> {
    match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
        Ok(TypedHeader(Authorization(bearer))) => Ok(Some(bearer.token().to_string())),
        Err(rejection) if rejection.is_missing() => Ok(None),
        Err(_) => Err(AuthError::Unauthorized),
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthGate: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = AuthGate::from_ref(state);
        let token = bearer_token(parts).await?;

        match gate.evaluate(token.as_deref()).await? {
            GateOutcome::Authenticated(user) => Ok(user),
            GateOutcome::Anonymous => Err(AuthError::Unauthorized),
        }
    }
}
