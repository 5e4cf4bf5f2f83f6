//! Visibility filter - which articles a subject may list or read.

use crate::domain::{Article, ArticleStatus, Role, Subject};
use crate::ports::ArticleQuery;

/// Listing scope requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<ArticleStatus>,
    /// Restrict to the caller's own articles ("my articles").
    pub owner_only: bool,
}

/// Build the store predicate for a listing.
///
/// Anonymous callers, readers, and writers browsing the public feed only see
/// published articles. A writer scoping to their own work sees every status
/// of their articles. Admins see everything. The requested status narrows the
/// result only where the caller is not already limited to the public feed.
pub fn list_query(subject: Option<&Subject>, filter: &ListFilter) -> ArticleQuery {
    let Some(subject) = subject else {
        return ArticleQuery::published();
    };

    match subject.role {
        Role::Admin => ArticleQuery {
            status: filter.status,
            author_id: None,
        },
        Role::Writer if filter.owner_only => ArticleQuery {
            status: filter.status,
            author_id: Some(subject.id),
        },
        Role::Writer | Role::Reader => ArticleQuery::published(),
    }
}

/// Whether a detail read is allowed when detail reads are restricted.
pub fn can_read_detail(subject: Option<&Subject>, article: &Article) -> bool {
    if article.status == ArticleStatus::Published {
        return true;
    }
    subject.is_some_and(|s| s.is_admin() || article.is_authored_by(s))
}
