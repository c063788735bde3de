//! Shared state for the authentication routes

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    credentials::{CredentialError, CredentialStore, HashingConfig},
    gate::AuthGate,
    jwt::{JwtConfig, JwtService},
    repositories::UserRepository,
};

/// Authentication state shared across handlers
#[derive(Clone)]
pub struct AuthState {
    pub credentials: CredentialStore,
    pub jwt_service: JwtService,
    pub gate: AuthGate,
}

impl AuthState {
    /// Wire the credential store, token service and gate over one user repository
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt_config: JwtConfig,
        hashing: HashingConfig,
    ) -> Result<Self, CredentialError> {
        let jwt_service = JwtService::new(jwt_config);
        let credentials = CredentialStore::new(users.clone(), hashing)?;
        let gate = AuthGate::new(jwt_service.clone(), users);

        Ok(Self {
            credentials,
            jwt_service,
            gate,
        })
    }
}

impl FromRef<AuthState> for AuthGate {
    fn from_ref(state: &AuthState) -> Self {
        state.gate.clone()
    }
}
