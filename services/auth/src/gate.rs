//! Auth gate: turns a presented bearer token into a resolved identity
//!
//! Every request is evaluated on its own and ends in exactly one of four
//! states: no credential (anonymous), invalid token, unknown subject, or
//! authenticated. Invalid tokens and unknown subjects are reported to the
//! caller identically; the specific reason is only logged.

use std::sync::Arc;

use blog_common::DatabaseError;
use thiserror::Error;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::{
    error::AuthError,
    jwt::{JwtService, TokenError},
    models::AuthUser,
    repositories::UserRepository,
};

/// Successful gate outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// No bearer token was presented
    Anonymous,
    /// Token verified and its subject resolved to a live account
    Authenticated(AuthUser),
}

/// Reasons the gate refuses a request
#[derive(Debug, Error)]
pub enum GateRejection {
    #[error("token rejected: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("token subject {0} does not resolve to a user")]
    UnknownSubject(Uuid),

    #[error("user lookup failed: {0}")]
    Database(#[from] DatabaseError),
}

impl From<GateRejection> for AuthError {
    fn from(rejection: GateRejection) -> Self {
        match rejection {
            GateRejection::InvalidToken(reason) => {
                warn!("Rejected bearer token: {}", reason);
                AuthError::Unauthorized
            }
            GateRejection::UnknownSubject(subject) => {
                warn!("Rejected bearer token for unknown subject {}", subject);
                AuthError::Unauthorized
            }
            GateRejection::Database(e) => {
                error!("Failed to resolve token subject: {}", e);
                AuthError::InternalServerError
            }
        }
    }
}

/// Token verification plus subject resolution
#[derive(Clone)]
pub struct AuthGate {
    jwt_service: JwtService,
    users: Arc<dyn UserRepository>,
}

impl AuthGate {
    pub fn new(jwt_service: JwtService, users: Arc<dyn UserRepository>) -> Self {
        Self { jwt_service, users }
    }

    /// Evaluate the bearer token presented with a request, if any
    pub async fn evaluate(&self, token: Option<&str>) -> Result<GateOutcome, GateRejection> {
        let Some(token) = token else {
            return Ok(GateOutcome::Anonymous);
        };

        let subject = self.jwt_service.verify(token)?;

        let user = self
            .users
            .find_by_id(subject)
            .await?
            .ok_or(GateRejection::UnknownSubject(subject))?;

        debug!("Authenticated request for user {}", user.id);
        Ok(GateOutcome::Authenticated(user.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        jwt::JwtConfig,
        models::NewUser,
        repositories::InMemoryUserRepository,
    };

    async fn gate_with_user() -> (AuthGate, JwtService, AuthUser) {
        let jwt = JwtService::new(JwtConfig::new("gate-secret"));
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create(&NewUser {
                name: "Alice".to_string(),
                email: "alice@x.com".to_string(),
                password_hash: "$argon2id$stub".to_string(),
            })
            .await
            .unwrap();

        let gate = AuthGate::new(jwt.clone(), Arc::new(repo));
        (gate, jwt, user.into())
    }

    #[tokio::test]
    async fn no_token_is_anonymous() {
        let (gate, _, _) = gate_with_user().await;
        assert_eq!(gate.evaluate(None).await.unwrap(), GateOutcome::Anonymous);
    }

    #[tokio::test]
    async fn valid_token_resolves_the_user() {
        let (gate, jwt, alice) = gate_with_user().await;
        let token = jwt.issue(alice.id).unwrap();

        let outcome = gate.evaluate(Some(&token)).await.unwrap();
        assert_eq!(outcome, GateOutcome::Authenticated(alice));
    }

    #[tokio::test]
    async fn forged_token_is_rejected() {
        let (gate, _, alice) = gate_with_user().await;
        let forged = JwtService::new(JwtConfig::new("not-our-secret"))
            .issue(alice.id)
            .unwrap();

        let rejection = gate.evaluate(Some(&forged)).await.unwrap_err();
        assert!(matches!(
            rejection,
            GateRejection::InvalidToken(TokenError::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn unknown_subject_is_rejected() {
        let (gate, jwt, _) = gate_with_user().await;
        let ghost = Uuid::new_v4();
        let token = jwt.issue(ghost).unwrap();

        let rejection = gate.evaluate(Some(&token)).await.unwrap_err();
        assert!(matches!(rejection, GateRejection::UnknownSubject(id) if id == ghost));
    }

    #[tokio::test]
    async fn every_token_failure_looks_the_same_to_the_caller() {
        let (gate, jwt, alice) = gate_with_user().await;
        let expired = jwt.issue_at(alice.id, 0).unwrap();
        let unknown = jwt.issue(Uuid::new_v4()).unwrap();

        for token in [expired.as_str(), unknown.as_str(), "garbage"] {
            let err: AuthError = gate.evaluate(Some(token)).await.unwrap_err().into();
            assert!(matches!(err, AuthError::Unauthorized));
            assert_eq!(err.to_string(), "Not authorized");
        }
    }
}
