//! State-changing operations: create, edit, submit, review, delete.

use chrono::Utc;
use uuid::Uuid;

use super::{ArticleService, require_subject};
use crate::domain::{Article, ArticleChanges, ArticleStatus, NewArticle, ReviewDecision, Subject};
use crate::error::DomainError;

impl ArticleService {
    /// Create a draft owned by the caller. Writers and admins only.
    pub async fn create_article(
        &self,
        subject: Option<&Subject>,
        draft: NewArticle,
    ) -> Result<Article, DomainError> {
        let subject = require_subject(subject)?;
        if !subject.role.can_author() {
            return Err(DomainError::Forbidden(
                "Only writers and admins can create articles".to_string(),
            ));
        }

        let article = Article::new(subject, draft, Utc::now())?;
        let id = article.id;
        let article = self
            .repo
            .insert(article)
            .await
            .map_err(|e| DomainError::from_repo(e, id, "create"))?;

        tracing::info!(article_id = %article.id, actor = %subject.id, "Article created as draft");
        Ok(article)
    }

    /// Edit the allow-listed fields of an article, whatever its status.
    ///
    /// The author (as a writer) or any admin may edit.
    pub async fn update_article(
        &self,
        subject: Option<&Subject>,
        id: Uuid,
        changes: ArticleChanges,
    ) -> Result<Article, DomainError> {
        let subject = require_subject(subject)?;
        if !subject.role.can_author() {
            return Err(DomainError::Forbidden(
                "Readers cannot edit articles".to_string(),
            ));
        }
        if changes.is_empty() {
            return Err(DomainError::Validation("No fields to update".to_string()));
        }

        let current = self.load(id, "update").await?;
        if subject.is_writer() && !current.is_authored_by(subject) {
            return Err(DomainError::Forbidden(
                "Writers can only edit their own articles".to_string(),
            ));
        }

        let patch = current.edit(changes, Utc::now())?;
        let article = self
            .repo
            .compare_and_swap(id, current.status, patch)
            .await
            .map_err(|e| DomainError::from_repo(e, id, "update"))?;

        tracing::info!(article_id = %id, actor = %subject.id, status = %article.status, "Article edited");
        Ok(article)
    }

    /// Send a draft or rejected article to review. Only its writer may do so;
    /// admins cannot submit on behalf of writers.
    pub async fn submit_article(
        &self,
        subject: Option<&Subject>,
        id: Uuid,
    ) -> Result<Article, DomainError> {
        let subject = require_subject(subject)?;
        let current = self.load(id, "submit").await?;
        if !(subject.is_writer() && current.is_authored_by(subject)) {
            return Err(DomainError::Forbidden(
                "Only the author can submit an article".to_string(),
            ));
        }

        let patch = current.submit(Utc::now(), self.policy.clear_rejection_on_submit)?;
        let article = self
            .repo
            .compare_and_swap(id, current.status, patch)
            .await
            .map_err(|e| DomainError::from_repo(e, id, "submit"))?;

        tracing::info!(
            article_id = %id,
            actor = %subject.id,
            from = %current.status,
            to = %article.status,
            "Article submitted for review"
        );
        Ok(article)
    }

    /// Approve or reject a pending article. Admins only.
    pub async fn review_article(
        &self,
        subject: Option<&Subject>,
        id: Uuid,
        decision: ReviewDecision,
    ) -> Result<Article, DomainError> {
        let subject = require_subject(subject)?;
        if !subject.is_admin() {
            tracing::debug!(article_id = %id, actor = %subject.id, role = %subject.role, "Review refused");
            return Err(DomainError::Forbidden(
                "Only admins can review articles".to_string(),
            ));
        }
        decision.validate()?;

        let current = self.load(id, decision.action()).await?;
        let patch = current.review(&decision, Utc::now())?;
        let article = self
            .repo
            .compare_and_swap(id, ArticleStatus::Pending, patch)
            .await
            .map_err(|e| DomainError::from_repo(e, id, decision.action()))?;

        tracing::info!(
            article_id = %id,
            actor = %subject.id,
            decision = decision.action(),
            to = %article.status,
            "Article reviewed"
        );
        Ok(article)
    }

    /// Permanently remove an article, whatever its status. Admins only.
    pub async fn delete_article(&self, subject: Option<&Subject>, id: Uuid) -> Result<(), DomainError> {
        let subject = require_subject(subject)?;
        if !subject.is_admin() {
            return Err(DomainError::Forbidden(
                "Only admins can delete articles".to_string(),
            ));
        }

        self.repo
            .delete(id)
            .await
            .map_err(|e| DomainError::from_repo(e, id, "delete"))?;

        tracing::info!(article_id = %id, actor = %subject.id, "Article deleted");
        Ok(())
    }
}
