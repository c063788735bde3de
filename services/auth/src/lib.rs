//! Authentication and authorization core for the blog platform
//!
//! - [`credentials`]: registration and password verification
//! - [`jwt`]: signed, time-limited bearer tokens
//! - [`gate`] and [`middleware`]: resolving a bearer token to a user
//! - [`ownership`]: who may mutate an authored resource
//! - [`routes`]: `/api/auth` and `/api/users` endpoints

pub mod credentials;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod ownership;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use error::AuthError;
pub use gate::AuthGate;
pub use models::AuthUser;
pub use ownership::{Authored, can_mutate};
pub use state::AuthState;
