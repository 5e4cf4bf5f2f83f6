//! Application services - the article lifecycle engine.
//!
//! Every operation takes the caller explicitly as `Option<&Subject>`; `None`
//! is an anonymous caller.

mod lifecycle;
mod reads;
pub mod visibility;

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Article, Subject};
use crate::error::DomainError;
use crate::ports::ArticleRepository;

pub use visibility::ListFilter;

/// Policy knobs for behaviour that is a product decision rather than an
/// invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    /// Drop the stored rejection reason when the author resubmits.
    pub clear_rejection_on_submit: bool,
    /// Hide unpublished articles from detail reads by anyone but their
    /// author or an admin.
    pub restrict_detail_reads: bool,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            clear_rejection_on_submit: true,
            restrict_detail_reads: false,
        }
    }
}

/// Validates and applies article transitions against an article store.
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    policy: LifecyclePolicy,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepository>, policy: LifecyclePolicy) -> Self {
        Self { repo, policy }
    }

    pub fn policy(&self) -> LifecyclePolicy {
        self.policy
    }

    async fn load(&self, id: Uuid, action: &'static str) -> Result<Article, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::from_repo(e, id, action))?
            .ok_or_else(|| DomainError::article_not_found(id))
    }
}

fn require_subject(subject: Option<&Subject>) -> Result<&Subject, DomainError> {
    subject.ok_or(DomainError::Unauthorized)
}
