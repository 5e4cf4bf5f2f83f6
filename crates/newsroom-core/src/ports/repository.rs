use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Article, ArticlePatch, ArticleStatus};
use crate::error::RepoError;

/// Predicate over stored articles, produced by the visibility filter.
///
/// Results are always ordered newest first by `created_at`, ties broken by
/// descending id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    pub status: Option<ArticleStatus>,
    pub author_id: Option<Uuid>,
}

impl ArticleQuery {
    pub fn published() -> Self {
        Self {
            status: Some(ArticleStatus::Published),
            author_id: None,
        }
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.status.is_none_or(|status| article.status == status)
            && self.author_id.is_none_or(|author| article.author_id == author)
    }
}

/// Durable keyed storage for articles.
///
/// Every method is atomic per article id.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Find an article by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, RepoError>;

    /// Store a freshly created article.
    async fn insert(&self, article: Article) -> Result<Article, RepoError>;

    /// Apply `patch` to the stored article only if its status is still
    /// `expected`, returning the article as written.
    ///
    /// Fields the patch leaves as `None` keep their stored values, and
    /// `updated_at` never moves backwards (see `Article::apply`). Fails with
    /// `RepoError::StatusMismatch` when another writer changed the status
    /// first, `RepoError::NotFound` when the id is gone.
    async fn compare_and_swap(
        &self,
        id: Uuid,
        expected: ArticleStatus,
        patch: ArticlePatch,
    ) -> Result<Article, RepoError>;

    /// Delete an article by its ID.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Atomically add one to the view counter, returning the updated article.
    async fn increment_view_count(&self, id: Uuid) -> Result<Option<Article>, RepoError>;

    /// All articles matching `query`, newest first.
    async fn query(&self, query: &ArticleQuery) -> Result<Vec<Article>, RepoError>;
}
