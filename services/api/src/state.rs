//! Application state shared across handlers

use std::{path::PathBuf, sync::Arc};

use axum::extract::FromRef;
use blog_auth::{
    AuthGate, AuthState,
    credentials::{CredentialError, HashingConfig},
    jwt::JwtConfig,
    repositories::{InMemoryUserRepository, PgUserRepository, UserRepository},
};
use sqlx::PgPool;

use crate::repositories::{
    CategoryRepository, CommentRepository, InMemoryCategoryRepository, InMemoryCommentRepository,
    InMemoryPostRepository, PgCategoryRepository, PgCommentRepository, PgPostRepository,
    PostRepository,
};

/// Largest accepted upload, in bytes
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Where uploaded images go
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl UploadConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub uploads: UploadConfig,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn postgres(
        pool: PgPool,
        jwt_config: JwtConfig,
        hashing: HashingConfig,
        uploads: UploadConfig,
    ) -> Result<Self, CredentialError> {
        Ok(Self {
            auth: AuthState::new(
                Arc::new(PgUserRepository::new(pool.clone())),
                jwt_config,
                hashing,
            )?,
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool)),
            uploads,
        })
    }

    /// State held entirely in process memory
    pub fn in_memory(
        jwt_config: JwtConfig,
        hashing: HashingConfig,
        uploads: UploadConfig,
    ) -> Result<Self, CredentialError> {
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let categories: Arc<dyn CategoryRepository> = Arc::new(InMemoryCategoryRepository::new());

        Ok(Self {
            auth: AuthState::new(users.clone(), jwt_config, hashing)?,
            posts: Arc::new(InMemoryPostRepository::new(users.clone(), categories.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(users)),
            categories,
            uploads,
        })
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for AuthGate {
    fn from_ref(state: &AppState) -> Self {
        state.auth.gate.clone()
    }
}
