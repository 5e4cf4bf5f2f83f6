//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod identity;
mod repository;

pub use identity::{AuthError, IdentityProvider};
pub use repository::{ArticleQuery, ArticleRepository};
