//! Blog HTTP API: posts, comments, categories and image uploads, with the
//! authentication routes from `blog-auth` mounted alongside.

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::{AppState, UploadConfig};
