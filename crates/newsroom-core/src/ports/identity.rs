//! Identity provider port.

use async_trait::async_trait;

use crate::domain::Subject;

/// Resolves a request credential into a subject.
///
/// The boundary calls this once per request and passes the result to every
/// service operation; nothing in the core reads ambient session state.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` means the credential is missing, malformed, or expired and the
    /// caller is treated as anonymous.
    async fn authenticate(&self, credential: &str) -> Option<Subject>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}
