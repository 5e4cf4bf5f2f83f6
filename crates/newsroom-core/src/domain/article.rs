use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Subject;
use crate::error::DomainError;

/// Number of characters of content used when no excerpt is supplied.
pub const EXCERPT_LENGTH: usize = 150;

const UNKNOWN_AUTHOR: &str = "Unknown";

/// Moderation status of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Pending,
    Published,
    Rejected,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Pending => "pending",
            ArticleStatus::Published => "published",
            ArticleStatus::Rejected => "rejected",
        }
    }

    /// Statuses from which the author may send the article to review.
    pub fn can_submit(&self) -> bool {
        matches!(self, ArticleStatus::Draft | ArticleStatus::Rejected)
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ArticleStatus::Draft),
            "pending" => Ok(ArticleStatus::Pending),
            "published" => Ok(ArticleStatus::Published),
            "rejected" => Ok(ArticleStatus::Rejected),
            other => Err(format!("unknown article status '{other}'")),
        }
    }
}

/// Outcome of an admin review of a pending article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject { reason: String },
}

impl ReviewDecision {
    pub fn action(&self) -> &'static str {
        match self {
            ReviewDecision::Approve => "approve",
            ReviewDecision::Reject { .. } => "reject",
        }
    }

    /// A rejection must carry a non-blank reason.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            ReviewDecision::Reject { reason } if reason.trim().is_empty() => Err(
                DomainError::Validation("Rejection reason is required".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// Fields supplied when an article is first written.
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
}

/// Allow-listed fields an edit may replace. `None` leaves the field as is.
///
/// An empty `excerpt` re-derives it from the content; an empty
/// `cover_image` removes the cover.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
}

impl ArticleChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.tags.is_none()
            && self.cover_image.is_none()
    }
}

/// Field writes of a single mutation. `None` leaves the stored value alone.
///
/// Stores apply a patch to the current row, so fields a mutation does not
/// own are never overwritten with a stale copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<Option<String>>,
    pub status: Option<ArticleStatus>,
    pub rejection_reason: Option<Option<String>>,
    /// Stamp `published_at` with this mutation's `updated_at`.
    pub publish: bool,
    pub updated_at: DateTime<Utc>,
}

impl ArticlePatch {
    /// A patch that only bumps `updated_at`.
    pub fn at(updated_at: DateTime<Utc>) -> Self {
        Self {
            title: None,
            content: None,
            excerpt: None,
            tags: None,
            cover_image: None,
            status: None,
            rejection_reason: None,
            publish: false,
            updated_at,
        }
    }
}

/// Article entity - a technical article moving through moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub status: ArticleStatus,
    pub view_count: u64,
    pub rejection_reason: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Create a new draft owned by `author`.
    pub fn new(author: &Subject, draft: NewArticle, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let title = require_text("Title", &draft.title)?;
        require_text("Content", &draft.content)?;

        let excerpt = match draft.excerpt {
            Some(excerpt) if !excerpt.trim().is_empty() => excerpt,
            _ => derive_excerpt(&draft.content),
        };
        let author_name = author
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        let now = now.trunc_subsecs(6);

        Ok(Self {
            id: Uuid::now_v7(),
            title,
            content: draft.content,
            excerpt,
            tags: normalize_tags(draft.tags),
            cover_image: draft.cover_image.filter(|c| !c.trim().is_empty()),
            author_id: author.id,
            author_name,
            status: ArticleStatus::Draft,
            view_count: 0,
            rejection_reason: None,
            published_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_authored_by(&self, subject: &Subject) -> bool {
        self.author_id == subject.id
    }

    /// Timestamp for the next mutation, strictly after the previous one.
    ///
    /// Stores keep microsecond precision, so the clock reading is truncated
    /// before comparing.
    pub fn next_update_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let now = now.trunc_subsecs(6);
        if now > self.updated_at {
            now
        } else {
            self.updated_at + TimeDelta::microseconds(1)
        }
    }

    /// Patch replacing the allow-listed content fields. Status is untouched.
    ///
    /// An empty `excerpt` is re-derived from the new content, or from the
    /// current content when the edit leaves it alone.
    pub fn edit(&self, changes: ArticleChanges, now: DateTime<Utc>) -> Result<ArticlePatch, DomainError> {
        let mut patch = ArticlePatch::at(self.next_update_time(now));

        if let Some(title) = changes.title {
            patch.title = Some(require_text("Title", &title)?);
        }
        if let Some(content) = changes.content {
            require_text("Content", &content)?;
            patch.content = Some(content);
        }
        if let Some(excerpt) = changes.excerpt {
            patch.excerpt = Some(if excerpt.trim().is_empty() {
                derive_excerpt(patch.content.as_deref().unwrap_or(&self.content))
            } else {
                excerpt
            });
        }
        if let Some(tags) = changes.tags {
            patch.tags = Some(normalize_tags(tags));
        }
        if let Some(cover_image) = changes.cover_image {
            patch.cover_image = Some(Some(cover_image).filter(|c| !c.trim().is_empty()));
        }

        Ok(patch)
    }

    /// Send the article to review: draft or rejected -> pending.
    pub fn submit(&self, now: DateTime<Utc>, clear_rejection: bool) -> Result<ArticlePatch, DomainError> {
        if !self.status.can_submit() {
            return Err(self.invalid_state("submit"));
        }

        let mut patch = ArticlePatch::at(self.next_update_time(now));
        patch.status = Some(ArticleStatus::Pending);
        if clear_rejection {
            patch.rejection_reason = Some(None);
        }
        Ok(patch)
    }

    /// Apply an admin decision: pending -> published or rejected.
    pub fn review(&self, decision: &ReviewDecision, now: DateTime<Utc>) -> Result<ArticlePatch, DomainError> {
        decision.validate()?;
        if self.status != ArticleStatus::Pending {
            return Err(self.invalid_state(decision.action()));
        }

        let mut patch = ArticlePatch::at(self.next_update_time(now));
        match decision {
            ReviewDecision::Approve => {
                patch.status = Some(ArticleStatus::Published);
                patch.publish = true;
            }
            ReviewDecision::Reject { reason } => {
                patch.status = Some(ArticleStatus::Rejected);
                patch.rejection_reason = Some(Some(reason.trim().to_string()));
            }
        }
        Ok(patch)
    }

    /// Write the fields carried by `patch`, leaving every other field as is.
    ///
    /// `updated_at` never moves backwards: a patch stamped before the stored
    /// time lands 1µs after it instead. `published_at` takes the same stamp.
    pub fn apply(&mut self, patch: &ArticlePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(excerpt) = &patch.excerpt {
            self.excerpt = excerpt.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        if let Some(cover_image) = &patch.cover_image {
            self.cover_image = cover_image.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(rejection_reason) = &patch.rejection_reason {
            self.rejection_reason = rejection_reason.clone();
        }

        let at = self.next_update_time(patch.updated_at);
        if patch.publish {
            self.published_at = Some(at);
        }
        self.updated_at = at;
    }

    /// Copy of the article with `patch` applied.
    pub fn patched(&self, patch: &ArticlePatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }

    fn invalid_state(&self, action: &'static str) -> DomainError {
        DomainError::InvalidState {
            id: self.id,
            status: self.status,
            action,
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn derive_excerpt(content: &str) -> String {
    content.chars().take(EXCERPT_LENGTH).collect()
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !seen.iter().any(|t: &String| t == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn writer() -> Subject {
        Subject::new(Uuid::now_v7(), Role::Writer).with_name("ada")
    }

    fn draft() -> Article {
        Article::new(
            &writer(),
            NewArticle {
                title: "Lock-free queues".to_string(),
                content: "Body".to_string(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn pending() -> Article {
        let article = draft();
        article.patched(&article.submit(Utc::now(), true).unwrap())
    }

    fn publication_consistent(article: &Article) -> bool {
        (article.status == ArticleStatus::Published) == article.published_at.is_some()
    }

    #[test]
    fn test_new_article_starts_as_draft() {
        let author = writer();
        let article = Article::new(
            &author,
            NewArticle {
                title: "  Title  ".to_string(),
                content: "Content".to_string(),
                tags: vec!["rust".into(), " rust ".into(), "".into(), "async".into()],
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();

        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.view_count, 0);
        assert_eq!(article.title, "Title");
        assert_eq!(article.author_id, author.id);
        assert_eq!(article.author_name, "ada");
        assert_eq!(article.tags, vec!["rust".to_string(), "async".to_string()]);
        assert_eq!(article.created_at, article.updated_at);
        assert!(article.published_at.is_none());
    }

    #[test]
    fn test_new_article_requires_title_and_content() {
        let author = writer();
        let missing_title = Article::new(
            &author,
            NewArticle {
                title: "   ".to_string(),
                content: "Body".to_string(),
                ..Default::default()
            },
            Utc::now(),
        );
        let missing_content = Article::new(
            &author,
            NewArticle {
                title: "Title".to_string(),
                ..Default::default()
            },
            Utc::now(),
        );

        assert!(matches!(missing_title, Err(DomainError::Validation(_))));
        assert!(matches!(missing_content, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_excerpt_falls_back_to_first_characters() {
        let content = "é".repeat(EXCERPT_LENGTH + 20);
        let article = Article::new(
            &Subject::new(Uuid::now_v7(), Role::Admin),
            NewArticle {
                title: "Unicode".to_string(),
                content,
                excerpt: Some(String::new()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();

        assert_eq!(article.excerpt.chars().count(), EXCERPT_LENGTH);
        assert_eq!(article.author_name, "Unknown");
    }

    #[test]
    fn test_changes_never_touch_status() {
        let article = draft();
        let patch = article
            .edit(
                ArticleChanges {
                    content: Some("New body".to_string()),
                    excerpt: Some(String::new()),
                    ..Default::default()
                },
                article.updated_at,
            )
            .unwrap();
        assert_eq!(patch.status, None);
        assert_eq!(patch.rejection_reason, None);

        let edited = article.patched(&patch);

        assert_eq!(edited.status, ArticleStatus::Draft);
        assert_eq!(edited.content, "New body");
        assert_eq!(edited.excerpt, "New body");
        assert!(edited.updated_at > article.updated_at);
    }

    #[test]
    fn test_blank_title_edit_is_refused() {
        let article = draft();
        let result = article.edit(
            ArticleChanges {
                title: Some(" ".to_string()),
                ..Default::default()
            },
            Utc::now(),
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_submit_only_from_draft_or_rejected() {
        let mut article = draft();
        for status in [ArticleStatus::Pending, ArticleStatus::Published] {
            article.status = status;
            assert!(matches!(
                article.submit(Utc::now(), true),
                Err(DomainError::InvalidState { action: "submit", .. })
            ));
        }
        for status in [ArticleStatus::Draft, ArticleStatus::Rejected] {
            article.status = status;
            let next = article.patched(&article.submit(Utc::now(), true).unwrap());
            assert_eq!(next.status, ArticleStatus::Pending);
        }
    }

    #[test]
    fn test_submit_clears_rejection_reason_when_asked() {
        let mut article = draft();
        article.status = ArticleStatus::Rejected;
        article.rejection_reason = Some("needs citations".to_string());

        let cleared = article.patched(&article.submit(Utc::now(), true).unwrap());
        let kept = article.patched(&article.submit(Utc::now(), false).unwrap());

        assert!(cleared.rejection_reason.is_none());
        assert_eq!(kept.rejection_reason.as_deref(), Some("needs citations"));
    }

    #[test]
    fn test_approve_sets_published_at() {
        let article = pending();
        assert!(publication_consistent(&article));

        let published = article.patched(&article.review(&ReviewDecision::Approve, Utc::now()).unwrap());

        assert_eq!(published.status, ArticleStatus::Published);
        assert_eq!(published.published_at, Some(published.updated_at));
        assert!(publication_consistent(&published));
    }

    #[test]
    fn test_review_outside_pending_is_invalid_state() {
        let article = draft();
        let result = article.review(&ReviewDecision::Approve, Utc::now());

        assert!(matches!(
            result,
            Err(DomainError::InvalidState {
                status: ArticleStatus::Draft,
                action: "approve",
                ..
            })
        ));
    }

    #[test]
    fn test_reject_requires_reason() {
        let result = pending().review(
            &ReviewDecision::Reject {
                reason: "  ".to_string(),
            },
            Utc::now(),
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_update_time_is_strictly_increasing() {
        let article = draft();
        let earlier = article.updated_at - TimeDelta::seconds(5);

        assert!(article.next_update_time(earlier) > article.updated_at);
        assert!(article.next_update_time(article.updated_at) > article.updated_at);
    }

    #[test]
    fn test_review_patch_leaves_content_alone() {
        let article = pending();
        let patch = article
            .review(
                &ReviewDecision::Reject {
                    reason: " needs benchmarks ".to_string(),
                },
                Utc::now(),
            )
            .unwrap();

        assert_eq!(patch.title, None);
        assert_eq!(patch.content, None);
        assert_eq!(patch.excerpt, None);
        assert_eq!(patch.tags, None);
        assert_eq!(patch.cover_image, None);
        assert!(!patch.publish);
        assert_eq!(patch.rejection_reason, Some(Some("needs benchmarks".to_string())));
    }

    #[test]
    fn test_stale_patch_never_moves_updated_at_back() {
        let mut article = pending();
        let stale = article.review(&ReviewDecision::Approve, Utc::now()).unwrap();
        let edit = article
            .edit(
                ArticleChanges {
                    content: Some("Newer body".to_string()),
                    ..Default::default()
                },
                Utc::now() + TimeDelta::seconds(30),
            )
            .unwrap();

        article.apply(&edit);
        let edited_at = article.updated_at;
        article.apply(&stale);

        assert_eq!(article.content, "Newer body");
        assert_eq!(article.status, ArticleStatus::Published);
        assert!(article.updated_at > edited_at);
        assert_eq!(article.published_at, Some(article.updated_at));
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&ArticleStatus::Published).unwrap();
        assert_eq!(json, "\"published\"");
        assert_eq!("rejected".parse::<ArticleStatus>().unwrap(), ArticleStatus::Rejected);
    }
}
