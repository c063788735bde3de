//! Credential store: registration and password verification
//!
//! Passwords are hashed with Argon2id under a per-user random salt. The work
//! factor is configurable, so `register` and `verify_password` are the slowest
//! operations in the service by design of the hash; both run on the blocking
//! thread pool.

use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use blog_common::DatabaseError;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    models::{NewUser, Registration, User},
    repositories::UserRepository,
    validation,
};

/// Argon2 work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashingConfig {
    /// Create a new HashingConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PASSWORD_HASH_MEMORY_KIB`: Memory cost in KiB (default: 19456)
    /// - `PASSWORD_HASH_ITERATIONS`: Number of passes (default: 2)
    /// - `PASSWORD_HASH_PARALLELISM`: Lanes (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let read = |key: &str, fallback: u32| {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            memory_kib: read("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib),
            iterations: read("PASSWORD_HASH_ITERATIONS", defaults.iterations),
            parallelism: read("PASSWORD_HASH_PARALLELISM", defaults.parallelism),
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, CredentialError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| CredentialError::Hashing(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Credential store errors
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Missing or malformed registration input
    #[error("{0}")]
    Validation(String),

    /// Another account already uses this email
    #[error("User already exists")]
    DuplicateEmail,

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// Persistence failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Credential store
#[derive(Clone)]
pub struct CredentialStore {
    repository: Arc<dyn UserRepository>,
    hasher: Argon2<'static>,
    dummy_hash: Arc<str>,
}

impl CredentialStore {
    /// Create a credential store over a user repository
    pub fn new(
        repository: Arc<dyn UserRepository>,
        config: HashingConfig,
    ) -> Result<Self, CredentialError> {
        let hasher = config.hasher()?;
        let dummy_hash = hash_password(&hasher, "dummy-password-for-unknown-accounts")?;

        Ok(Self {
            repository,
            hasher,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Underlying user repository
    pub fn repository(&self) -> Arc<dyn UserRepository> {
        self.repository.clone()
    }

    /// Register a new account.
    ///
    /// Returns the stored user. A duplicate email fails with
    /// [`CredentialError::DuplicateEmail`] and leaves the store unchanged.
    pub async fn register(&self, registration: &Registration) -> Result<User, CredentialError> {
        let name = registration.name.trim();
        let email = registration.email.trim();

        if name.is_empty() || email.is_empty() || registration.password.is_empty() {
            return Err(CredentialError::Validation(
                "Please fill all fields".to_string(),
            ));
        }

        validation::validate_name(name).map_err(CredentialError::Validation)?;
        validation::validate_email(email).map_err(CredentialError::Validation)?;
        validation::validate_password(&registration.password)
            .map_err(CredentialError::Validation)?;

        let hasher = self.hasher.clone();
        let password = registration.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&hasher, &password))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))??;

        let new_user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        };

        match self.repository.create(&new_user).await {
            Ok(user) => {
                info!("Registered user {}", user.id);
                Ok(user)
            }
            Err(e) if e.is_unique_violation() => {
                warn!("Registration rejected: email already in use");
                Err(CredentialError::DuplicateEmail)
            }
            Err(e) => Err(CredentialError::Database(e)),
        }
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, CredentialError> {
        Ok(self.repository.find_by_email(email.trim()).await?)
    }

    /// Verify a user's password
    pub async fn verify_password(&self, user: &User, password: &str) -> bool {
        self.verify_against(user.password_hash.clone(), password).await
    }

    /// Look up an account and check its password in one step.
    ///
    /// An unknown email still costs one hash verification, so callers cannot
    /// tell the two failure cases apart by timing.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, CredentialError> {
        match self.find_by_email(email).await? {
            Some(user) => {
                if self.verify_password(&user, password).await {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => {
                self.verify_against(self.dummy_hash.to_string(), password)
                    .await;
                Ok(None)
            }
        }
    }

    async fn verify_against(&self, stored_hash: String, password: &str) -> bool {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        let outcome = tokio::task::spawn_blocking(move || {
            let parsed = match PasswordHash::new(&stored_hash) {
                Ok(parsed) => parsed,
                Err(e) => {
                    error!("Failed to parse password hash: {}", e);
                    return false;
                }
            };
            hasher.verify_password(password.as_bytes(), &parsed).is_ok()
        })
        .await;

        outcome.unwrap_or_else(|e| {
            error!("Password verification task failed: {}", e);
            false
        })
    }
}

fn hash_password(hasher: &Argon2<'static>, password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    hasher
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hashing(format!("Failed to hash password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryUserRepository;

    fn fast_hashing() -> HashingConfig {
        HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(InMemoryUserRepository::new()), fast_hashing()).unwrap()
    }

    fn registration(name: &str, email: &str, password: &str) -> Registration {
        Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_stores_a_salted_hash() {
        let store = store();
        let alice = store
            .register(&registration("Alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.email, "alice@x.com");
        assert_ne!(alice.password_hash, "secret1");
        assert!(alice.password_hash.starts_with("$argon2id$"));

        let bob = store
            .register(&registration("Bob", "bob@x.com", "secret1"))
            .await
            .unwrap();
        assert_ne!(alice.password_hash, bob.password_hash);
    }

    #[tokio::test]
    async fn verify_password_accepts_only_the_original() {
        let store = store();
        let user = store
            .register(&registration("Alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        assert!(store.verify_password(&user, "secret1").await);
        assert!(!store.verify_password(&user, "secret2").await);
        assert!(!store.verify_password(&user, "").await);
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let store = store();

        for reg in [
            registration("", "alice@x.com", "secret1"),
            registration("Alice", "", "secret1"),
            registration("Alice", "alice@x.com", ""),
        ] {
            let err = store.register(&reg).await.unwrap_err();
            assert!(matches!(err, CredentialError::Validation(ref m) if m == "Please fill all fields"));
        }
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let store = store();
        let err = store
            .register(&registration("Alice", "not-an-email", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::Validation(_)));
        assert!(store.find_by_email("not-an-email").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_fails_the_second_time() {
        let store = store();
        let first = store
            .register(&registration("Alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        let err = store
            .register(&registration("Other", "alice@x.com", "another1"))
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::DuplicateEmail));

        let stored = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert!(store.verify_password(&stored, "secret1").await);
    }

    #[tokio::test]
    async fn concurrent_duplicate_registrations_admit_exactly_one() {
        let store = store();
        let reg = registration("Alice", "race@x.com", "secret1");

        let (a, b) = tokio::join!(store.register(&reg), store.register(&reg));

        let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1);
        assert!(
            [a, b]
                .into_iter()
                .any(|r| matches!(r, Err(CredentialError::DuplicateEmail)))
        );
    }

    #[tokio::test]
    async fn authenticate_fails_generically() {
        let store = store();
        let user = store
            .register(&registration("Alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        let found = store.authenticate("alice@x.com", "secret1").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        assert!(store.authenticate("alice@x.com", "wrong-pass").await.unwrap().is_none());
        assert!(store.authenticate("nobody@x.com", "secret1").await.unwrap().is_none());
    }

    #[test]
    fn invalid_work_factor_is_reported() {
        let config = HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        };
        assert!(matches!(
            CredentialStore::new(Arc::new(InMemoryUserRepository::new()), config),
            Err(CredentialError::Hashing(_))
        ));
    }
}
