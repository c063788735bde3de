//! Authentication models

pub mod user;

pub use user::{AuthUser, LoginCredentials, NewUser, Registration, User};
