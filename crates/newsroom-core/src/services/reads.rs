//! Detail reads with view accounting, and filtered listings.

use uuid::Uuid;

use super::visibility::{self, ListFilter};
use super::ArticleService;
use crate::domain::{Article, Subject};
use crate::error::DomainError;

impl ArticleService {
    /// Fetch one article and count the view.
    ///
    /// Every successful fetch adds exactly one view, with no deduplication.
    /// The increment is not rolled back if the caller never receives the
    /// response.
    pub async fn get_article(
        &self,
        subject: Option<&Subject>,
        id: Uuid,
    ) -> Result<Article, DomainError> {
        // The visibility check and the increment are separate steps. A status
        // change landing between them is accepted: the read is judged on the
        // status seen at check time.
        if self.policy.restrict_detail_reads {
            let article = self.load(id, "read").await?;
            if !visibility::can_read_detail(subject, &article) {
                tracing::debug!(article_id = %id, status = %article.status, "Detail read hidden");
                return Err(DomainError::article_not_found(id));
            }
        }

        self.repo
            .increment_view_count(id)
            .await
            .map_err(|e| DomainError::from_repo(e, id, "read"))?
            .ok_or_else(|| DomainError::article_not_found(id))
    }

    /// List the articles the caller may see, newest first.
    pub async fn list_articles(
        &self,
        subject: Option<&Subject>,
        filter: ListFilter,
    ) -> Result<Vec<Article>, DomainError> {
        let query = visibility::list_query(subject, &filter);
        tracing::debug!(?query, "Listing articles");

        self.repo
            .query(&query)
            .await
            .map_err(|e| DomainError::StorageUnavailable(e.to_string()))
    }
}
