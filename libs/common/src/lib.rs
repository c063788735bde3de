//! Common library for the blog platform
//!
//! This crate provides shared functionality used by the blog services,
//! including database connectivity, schema migrations and the persistence
//! error taxonomy.

pub mod database;
pub mod error;

pub use error::{DatabaseError, DatabaseResult};
