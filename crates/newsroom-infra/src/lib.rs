//! # Newsroom Infrastructure
//!
//! Concrete implementations of the ports defined in `newsroom-core`.
//! This crate contains the article stores and the identity provider.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL article store via SeaORM
//! - `auth` - JWT identity provider

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryArticleRepository};

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtIdentityProvider};

#[cfg(feature = "postgres")]
pub use database::PostgresArticleRepository;
