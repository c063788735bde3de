//! JWT service for token generation and validation
//!
//! Tokens are HS256-signed with a process-wide secret and carry only the
//! subject's user id. They are stateless: there is no server-side session or
//! revocation list, so a token stays valid until it expires.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifetime of an issued token: 30 days
pub const TOKEN_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token expiration time in seconds
    pub token_ttl: u64,
}

impl JwtConfig {
    /// Build a configuration around a secret with the standard 30 day lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: TOKEN_TTL_SECONDS,
        }
    }

    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Signing secret (required, must not be empty)
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| {
            TokenError::Configuration("JWT_SECRET environment variable not set".to_string())
        })?;

        if secret.trim().is_empty() {
            return Err(TokenError::Configuration(
                "JWT_SECRET must not be empty".to_string(),
            ));
        }

        Ok(Self::new(secret))
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature does not match the payload under our secret
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Signature is fine but the token is past its expiry
    #[error("token has expired")]
    Expired,

    /// Token does not parse as a signed claims set
    #[error("token is malformed: {0}")]
    Malformed(String),

    /// Encoding a new token failed
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// Secret missing or unusable
    #[error("JWT configuration error: {0}")]
    Configuration(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            token_ttl: config.token_ttl,
        }
    }

    /// Issue a token for a subject, valid from now
    pub fn issue(&self, subject_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now().timestamp().max(0) as u64;
        self.issue_at(subject_id, now)
    }

    /// Issue a token as if it had been signed at `issued_at` (unix seconds)
    pub fn issue_at(&self, subject_id: Uuid, issued_at: u64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject_id,
            iat: issued_at,
            exp: issued_at + self.token_ttl,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return the subject it was issued for
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims.sub)
    }

    /// Get the token expiry time in seconds
    pub fn token_ttl(&self) -> u64 {
        self.token_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig::new(secret))
    }

    fn tamper_signature(token: &str) -> String {
        let (head, signature) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        let middle = chars.len() / 2;
        chars[middle] = if chars[middle] == 'A' { 'B' } else { 'A' };
        format!("{}.{}", head, chars.into_iter().collect::<String>())
    }

    #[test]
    fn issued_token_verifies_to_subject() {
        let jwt = service("test-secret");
        let subject = Uuid::new_v4();

        let token = jwt.issue(subject).unwrap();
        assert_eq!(jwt.verify(&token).unwrap(), subject);
    }

    #[test]
    fn token_expires_thirty_days_after_issue() {
        let jwt = service("test-secret");
        let token = jwt.issue_at(Uuid::new_v4(), 1_000).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims.iat, 1_000);
        assert_eq!(data.claims.exp, 1_000 + 30 * 24 * 60 * 60);
    }

    #[test]
    fn altered_signature_is_rejected() {
        let jwt = service("test-secret");
        let token = jwt.issue(Uuid::new_v4()).unwrap();

        let result = jwt.verify(&tamper_signature(&token));
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let ours = service("test-secret");
        let theirs = service("some-other-secret");
        let token = theirs.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(
            ours.verify(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_token_is_rejected_even_with_valid_signature() {
        let jwt = service("test-secret");
        let long_ago = Utc::now().timestamp() as u64 - TOKEN_TTL_SECONDS - 3_600;
        let token = jwt.issue_at(Uuid::new_v4(), long_ago).unwrap();

        assert!(matches!(jwt.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn garbage_is_malformed() {
        let jwt = service("test-secret");

        for token in ["", "not-a-token", "a.b", "a.b.c"] {
            assert!(
                matches!(jwt.verify(token), Err(TokenError::Malformed(_))),
                "{:?} should be malformed",
                token
            );
        }
    }

    #[test]
    #[serial]
    fn config_requires_secret() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
        assert!(matches!(
            JwtConfig::from_env(),
            Err(TokenError::Configuration(_))
        ));

        unsafe {
            std::env::set_var("JWT_SECRET", "from-env");
        }
        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.secret, "from-env");
        assert_eq!(config.token_ttl, TOKEN_TTL_SECONDS);
        assert!(!format!("{:?}", config).contains("from-env"));

        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
    }
}
