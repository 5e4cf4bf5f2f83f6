//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::ArticleStatus;

/// Domain errors - business logic failures.
///
/// Each variant maps to a distinct external status at the boundary, so the
/// engine never collapses one kind into another.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot {action} article {id} while it is {status}")]
    InvalidState {
        id: Uuid,
        status: ArticleStatus,
        action: &'static str,
    },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl DomainError {
    pub fn article_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Article",
            id,
        }
    }

    /// Translate a store failure for the article `id`.
    ///
    /// A status mismatch means another transition won the race; it surfaces as
    /// `InvalidState` carrying the status that is actually stored.
    pub fn from_repo(err: RepoError, id: Uuid, action: &'static str) -> Self {
        match err {
            RepoError::NotFound => Self::article_not_found(id),
            RepoError::StatusMismatch { actual, .. } => Self::InvalidState {
                id,
                status: actual,
                action,
            },
            other => Self::StorageUnavailable(other.to_string()),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Status changed concurrently: expected {expected}, found {actual}")]
    StatusMismatch {
        expected: ArticleStatus,
        actual: ArticleStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mismatch_becomes_invalid_state() {
        let id = Uuid::now_v7();
        let err = DomainError::from_repo(
            RepoError::StatusMismatch {
                expected: ArticleStatus::Pending,
                actual: ArticleStatus::Published,
            },
            id,
            "approve",
        );

        assert!(matches!(
            err,
            DomainError::InvalidState {
                status: ArticleStatus::Published,
                action: "approve",
                ..
            }
        ));
    }

    #[test]
    fn test_backend_failure_is_never_masked() {
        let err = DomainError::from_repo(
            RepoError::Connection("refused".to_string()),
            Uuid::now_v7(),
            "submit",
        );

        assert!(matches!(err, DomainError::StorageUnavailable(msg) if msg.contains("refused")));
    }
}
